// ==========================================
// 高校排课系统 - 通道式连接发送端
// ==========================================
// 用途: 传输层（WebSocket 写任务）从接收端取消息写出
// ==========================================

use crate::notify::registry::{NotificationSocket, NotifyError};
use async_trait::async_trait;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub struct ChannelSocket {
    tx: UnboundedSender<String>,
}

impl ChannelSocket {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// 创建发送端与对应接收端
    pub fn pair() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NotificationSocket for ChannelSocket {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        self.tx
            .send(text.to_string())
            .map_err(|_| NotifyError::Closed)
    }
}
