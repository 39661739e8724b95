// ==========================================
// 高校排课系统 - 实时通知会话
// ==========================================
// 流程: 校验令牌 -> 登记连接 -> 回显入站消息 -> 结束/出错时注销
// 传输层只需提供发送端与入站消息流
// ==========================================

use crate::auth::Authenticator;
use crate::notify::registry::{NotificationRegistry, NotificationSocket, NotifyError};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 令牌缺失或无效时的关闭码
pub const CLOSE_UNAUTHORIZED: u16 = 4401;

/// 会话结束方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 认证失败，传输层应以 close_code 关闭连接
    Rejected { close_code: u16 },
    /// 会话正常结束（对端关闭或连接出错）
    Closed { user_id: String, echoed: usize },
}

pub struct NotificationSession {
    registry: Arc<NotificationRegistry>,
    authenticator: Arc<Authenticator>,
}

impl NotificationSession {
    pub fn new(registry: Arc<NotificationRegistry>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            registry,
            authenticator,
        }
    }

    /// 运行一个会话直至入站流结束
    ///
    /// # 参数
    /// - token: 连接时携带的身份令牌
    /// - socket: 该连接的发送端
    /// - inbound: 入站文本消息流
    ///
    /// # 返回
    /// 会话结束方式；认证失败时连接不会被登记
    pub async fn run<S>(
        &self,
        token: Option<&str>,
        socket: Arc<dyn NotificationSocket>,
        mut inbound: S,
    ) -> SessionOutcome
    where
        S: Stream<Item = Result<String, NotifyError>> + Unpin + Send,
    {
        let claims = match self.authenticator.verify_token(token).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "通知连接认证失败");
                return SessionOutcome::Rejected {
                    close_code: CLOSE_UNAUTHORIZED,
                };
            }
        };

        let user_id = claims.uid;
        let connection_id = self.registry.connect(&user_id, socket.clone());
        info!(user_id = %user_id, connection_id = %connection_id, "通知连接已登记");

        let mut echoed = 0usize;
        while let Some(message) = inbound.next().await {
            match message {
                Ok(text) => {
                    if let Err(e) = socket.send_text(&text).await {
                        warn!(user_id = %user_id, error = %e, "回显失败，结束会话");
                        break;
                    }
                    echoed += 1;
                }
                Err(e) => {
                    debug!(user_id = %user_id, error = %e, "入站流出错，结束会话");
                    break;
                }
            }
        }

        self.registry.disconnect(&user_id, &connection_id);
        info!(user_id = %user_id, echoed, "通知连接已注销");
        SessionOutcome::Closed { user_id, echoed }
    }
}
