// ==========================================
// 高校排课系统 - 意见反馈 API
// ==========================================
// 学生/教师 -> 管理员邮箱；未配置管理员邮箱时服务不可用
// 返回值区分"已发出"与"仅入待发箱"
// ==========================================

use crate::api::dto::SentAck;
use crate::api::error::{ApiError, ApiResult};
use crate::auth::{Authenticator, RequireRoles};
use crate::config::SchedulerConfigReader;
use crate::domain::feedback::{Feedback, FeedbackChannel, OutboundMail};
use crate::notify::MailTransport;
use std::sync::Arc;
use tracing::info;

pub struct FeedbackApi {
    auth: Arc<Authenticator>,
    config: Arc<dyn SchedulerConfigReader>,
    mailer: Arc<dyn MailTransport>,
}

impl FeedbackApi {
    pub fn new(
        auth: Arc<Authenticator>,
        config: Arc<dyn SchedulerConfigReader>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            auth,
            config,
            mailer,
        }
    }

    pub async fn student_feedback(&self, token: Option<&str>, feedback: &Feedback) -> ApiResult<SentAck> {
        self.submit(token, FeedbackChannel::Student, feedback).await
    }

    pub async fn faculty_feedback(&self, token: Option<&str>, feedback: &Feedback) -> ApiResult<SentAck> {
        self.submit(token, FeedbackChannel::Faculty, feedback).await
    }

    async fn submit(
        &self,
        token: Option<&str>,
        channel: FeedbackChannel,
        feedback: &Feedback,
    ) -> ApiResult<SentAck> {
        let policy = match channel {
            FeedbackChannel::Student => RequireRoles::student_or_admin(),
            FeedbackChannel::Faculty => RequireRoles::faculty_or_admin(),
        };
        let caller = self.auth.require(token, &policy).await?;

        let admin_email = self
            .config
            .get_admin_feedback_email()
            .await?
            .ok_or_else(|| ApiError::ServiceUnavailable("未配置管理员反馈邮箱".to_string()))?;

        let mail = OutboundMail::from_feedback(&admin_email, channel, &caller.uid, &caller.email, feedback);
        let delivery = self.mailer.send(&mail).await?;
        info!(uid = %caller.uid, channel = channel.sender_label(), ?delivery, "反馈已提交");
        Ok(SentAck::from(delivery))
    }
}
