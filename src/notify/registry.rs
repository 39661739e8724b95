// ==========================================
// 高校排课系统 - 实时通知连接注册表
// ==========================================
// 生命周期: 进程启动时构造一次，注入各会话与接口
// 并发: 发送基于连接快照，发送期间的断开不影响遍历
// 红线: 用户连接数归零时移除该用户条目
// ==========================================

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// 通知发送错误
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("连接已关闭")]
    Closed,

    #[error("消息发送失败: {0}")]
    Send(String),

    #[error("邮件投递失败: {0}")]
    Mail(String),
}

/// 单条在线连接的发送端
#[async_trait]
pub trait NotificationSocket: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError>;
}

/// 连接句柄（注册时分配）
pub type ConnectionId = String;

type UserConnections = HashMap<ConnectionId, Arc<dyn NotificationSocket>>;

// ==========================================
// NotificationRegistry - 连接注册表
// ==========================================
#[derive(Default)]
pub struct NotificationRegistry {
    users: RwLock<HashMap<String, UserConnections>>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一条连接，返回连接句柄
    pub fn connect(&self, user_id: &str, socket: Arc<dyn NotificationSocket>) -> ConnectionId {
        let connection_id = uuid::Uuid::new_v4().to_string();
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users
            .entry(user_id.to_string())
            .or_default()
            .insert(connection_id.clone(), socket);
        debug!(user_id, connection_id = %connection_id, "通知连接已登记");
        connection_id
    }

    /// 注销连接；返回该连接此前是否存在
    pub fn disconnect(&self, user_id: &str, connection_id: &str) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let Some(connections) = users.get_mut(user_id) else {
            return false;
        };
        let removed = connections.remove(connection_id).is_some();
        if connections.is_empty() {
            users.remove(user_id);
        }
        if removed {
            debug!(user_id, connection_id, "通知连接已注销");
        }
        removed
    }

    /// 向某用户的全部连接发送，返回成功条数
    pub async fn send_to_user(&self, user_id: &str, message: &str) -> usize {
        let snapshot: Vec<_> = {
            let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
            users
                .get(user_id)
                .map(|conns| {
                    conns
                        .iter()
                        .map(|(id, s)| (user_id.to_string(), id.clone(), s.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };
        self.deliver(snapshot, message).await
    }

    /// 向全部在线连接广播，返回成功条数
    pub async fn broadcast(&self, message: &str) -> usize {
        let snapshot: Vec<_> = {
            let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
            users
                .iter()
                .flat_map(|(user, conns)| {
                    conns
                        .iter()
                        .map(move |(id, s)| (user.clone(), id.clone(), s.clone()))
                })
                .collect()
        };
        self.deliver(snapshot, message).await
    }

    /// 并发发送；失败的连接在本轮结束后注销
    async fn deliver(
        &self,
        snapshot: Vec<(String, ConnectionId, Arc<dyn NotificationSocket>)>,
        message: &str,
    ) -> usize {
        let sends = snapshot.iter().map(|(_, _, socket)| socket.send_text(message));
        let results = join_all(sends).await;

        let mut delivered = 0;
        for ((user_id, connection_id, _), result) in snapshot.iter().zip(results) {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(user_id = %user_id, connection_id = %connection_id, error = %e, "发送失败，移除连接");
                    self.disconnect(user_id, connection_id);
                }
            }
        }
        delivered
    }

    /// 在线用户数
    pub fn user_count(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 某用户的在线连接数
    pub fn connection_count(&self, user_id: &str) -> usize {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .map_or(0, HashMap::len)
    }

    pub fn is_connected(&self, user_id: &str) -> bool {
        self.connection_count(user_id) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::channel_socket::ChannelSocket;

    #[test]
    fn test_connect_disconnect_removes_empty_user() {
        let registry = NotificationRegistry::new();
        let (a, _rx_a) = ChannelSocket::pair();
        let (b, _rx_b) = ChannelSocket::pair();

        let id_a = registry.connect("u1", Arc::new(a));
        let id_b = registry.connect("u1", Arc::new(b));
        assert_eq!(registry.connection_count("u1"), 2);

        assert!(registry.disconnect("u1", &id_a));
        assert_eq!(registry.user_count(), 1);
        assert!(registry.disconnect("u1", &id_b));
        assert_eq!(registry.user_count(), 0);
        assert!(!registry.disconnect("u1", &id_b));
    }

    #[tokio::test]
    async fn test_send_to_user_only_reaches_that_user() {
        let registry = NotificationRegistry::new();
        let (a, mut rx_a) = ChannelSocket::pair();
        let (b, mut rx_b) = ChannelSocket::pair();
        registry.connect("u1", Arc::new(a));
        registry.connect("u2", Arc::new(b));

        assert_eq!(registry.send_to_user("u1", "hello").await, 1);
        assert_eq!(rx_a.recv().await.as_deref(), Some("hello"));
        assert!(rx_b.try_recv().is_err());
        assert_eq!(registry.send_to_user("nobody", "x").await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_prunes_closed_sockets() {
        let registry = NotificationRegistry::new();
        let (live, mut rx_live) = ChannelSocket::pair();
        let (dead, rx_dead) = ChannelSocket::pair();
        registry.connect("u1", Arc::new(live));
        registry.connect("u2", Arc::new(dead));
        drop(rx_dead);

        assert_eq!(registry.broadcast("notice").await, 1);
        assert_eq!(rx_live.recv().await.as_deref(), Some("notice"));
        assert!(!registry.is_connected("u2"));
        assert_eq!(registry.user_count(), 1);
    }
}
