// ==========================================
// 高校排课系统 - 通知层
// ==========================================
// 职责: 在线连接注册与推送、通知会话、邮件投递
// ==========================================

pub mod channel_socket;
pub mod mail;
pub mod registry;
pub mod session;

pub use channel_socket::ChannelSocket;
pub use mail::{deliver_pending, MailDelivery, MailTransport, OutboxMailTransport, SmtpMailTransport};
pub use registry::{ConnectionId, NotificationRegistry, NotificationSocket, NotifyError};
pub use session::{NotificationSession, SessionOutcome, CLOSE_UNAUTHORIZED};
