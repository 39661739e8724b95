// ==========================================
// 高校排课系统 - 邮件投递
// ==========================================
// SmtpMailTransport   已配置 SMTP 时直接发送（STARTTLS）
// OutboxMailTransport 未配置时写入待发箱，由 deliver_pending 补发
// ==========================================

use crate::config::smtp_config::SmtpConfig;
use crate::domain::feedback::OutboundMail;
use crate::notify::registry::NotifyError;
use crate::repository::MailOutboxRepository;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

/// 投递结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailDelivery {
    /// 已交给邮件服务器
    Sent,
    /// 仅入待发箱，尚未发出
    Queued,
}

/// 邮件投递接口
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<MailDelivery, NotifyError>;
}

// ==========================================
// SmtpMailTransport - SMTP 直发
// ==========================================
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailTransport {
    /// 按配置创建（不建立连接）
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Mail(format!("SMTP 配置无效: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            mailer,
            sender: config.sender.clone(),
        })
    }

    fn build_message(&self, mail: &OutboundMail) -> Result<Message, NotifyError> {
        let from = self
            .sender
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Mail(format!("发件人地址无效 {}: {}", self.sender, e)))?;
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Mail(format!("收件人地址无效 {}: {}", mail.to, e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| NotifyError::Mail(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<MailDelivery, NotifyError> {
        let message = self.build_message(mail)?;
        self.mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Mail(e.to_string()))?;
        info!(to = %mail.to, "邮件已发送");
        Ok(MailDelivery::Sent)
    }
}

// ==========================================
// OutboxMailTransport - 写入待发箱
// ==========================================
pub struct OutboxMailTransport {
    outbox: Arc<MailOutboxRepository>,
}

impl OutboxMailTransport {
    pub fn new(outbox: Arc<MailOutboxRepository>) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl MailTransport for OutboxMailTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<MailDelivery, NotifyError> {
        let id = self
            .outbox
            .enqueue(mail)
            .map_err(|e| NotifyError::Mail(e.to_string()))?;
        info!(outbox_id = %id, to = %mail.to, "邮件已入待发箱");
        Ok(MailDelivery::Queued)
    }
}

/// 补发待发箱中的邮件，返回成功发出的封数
///
/// 单封失败只告警，保留 PENDING 等待下次补发
pub async fn deliver_pending(
    outbox: &MailOutboxRepository,
    transport: &dyn MailTransport,
) -> Result<usize, NotifyError> {
    let pending = outbox
        .list_pending()
        .map_err(|e| NotifyError::Mail(e.to_string()))?;

    let mut delivered = 0;
    for entry in &pending {
        match transport.send(&entry.mail).await {
            Ok(MailDelivery::Sent) => {
                outbox
                    .mark_sent(&entry.id)
                    .map_err(|e| NotifyError::Mail(e.to_string()))?;
                delivered += 1;
            }
            Ok(MailDelivery::Queued) => {
                warn!(outbox_id = %entry.id, "投递端仍为待发箱，跳过");
            }
            Err(e) => {
                warn!(outbox_id = %entry.id, to = %entry.mail.to, error = %e, "补发失败，保留待发");
            }
        }
    }

    info!(pending = pending.len(), delivered, "待发箱补发完成");
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn outbox() -> Arc<MailOutboxRepository> {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        Arc::new(MailOutboxRepository::from_connection(Arc::new(Mutex::new(conn))))
    }

    fn mail(to: &str) -> OutboundMail {
        OutboundMail {
            to: to.to_string(),
            subject: "[Student Feedback] Hi".to_string(),
            body: "From student s1 (s1@gmail.com):\n\nHello".to_string(),
        }
    }

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: "office@gmail.com".to_string(),
            password: "secret".to_string(),
            sender: "office@gmail.com".to_string(),
        }
    }

    /// 只接受指定收件人的发送端
    struct SelectiveTransport {
        accept: &'static str,
    }

    #[async_trait]
    impl MailTransport for SelectiveTransport {
        async fn send(&self, mail: &OutboundMail) -> Result<MailDelivery, NotifyError> {
            if mail.to == self.accept {
                Ok(MailDelivery::Sent)
            } else {
                Err(NotifyError::Mail("connection refused".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_outbox_transport_reports_queued() {
        let outbox = outbox();
        let transport = OutboxMailTransport::new(outbox.clone());
        assert_eq!(transport.send(&mail("a@gmail.com")).await.unwrap(), MailDelivery::Queued);
        assert_eq!(outbox.list_pending().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deliver_pending_marks_only_sent() {
        let outbox = outbox();
        outbox.enqueue(&mail("a@gmail.com")).unwrap();
        outbox.enqueue(&mail("b@gmail.com")).unwrap();

        let transport = SelectiveTransport { accept: "a@gmail.com" };
        let delivered = deliver_pending(&outbox, &transport).await.unwrap();

        assert_eq!(delivered, 1);
        let left = outbox.list_pending().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].mail.to, "b@gmail.com");
    }

    #[tokio::test]
    async fn test_deliver_pending_through_outbox_keeps_mail() {
        let outbox = outbox();
        outbox.enqueue(&mail("a@gmail.com")).unwrap();
        let transport = OutboxMailTransport::new(outbox.clone());

        assert_eq!(deliver_pending(&outbox, &transport).await.unwrap(), 0);
        assert!(!outbox.list_pending().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_smtp_message_building() {
        let transport = SmtpMailTransport::new(&smtp_config()).unwrap();
        assert!(transport.build_message(&mail("admin@gmail.com")).is_ok());
        assert!(matches!(
            transport.build_message(&mail("not an address")),
            Err(NotifyError::Mail(_))
        ));
    }
}
