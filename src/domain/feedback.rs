// ==========================================
// 高校排课系统 - 意见反馈与外发邮件
// ==========================================

use crate::domain::types::Role;
use serde::{Deserialize, Serialize};

/// 反馈内容（客户端提交）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub subject: String,
    pub message: String,
}

/// 反馈通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackChannel {
    Student,
    Faculty,
}

impl FeedbackChannel {
    /// 邮件主题前缀
    pub fn subject_prefix(&self) -> &'static str {
        match self {
            FeedbackChannel::Student => "[Student Feedback]",
            FeedbackChannel::Faculty => "[Faculty Feedback]",
        }
    }

    /// 正文中的来源角色名
    pub fn sender_label(&self) -> &'static str {
        match self {
            FeedbackChannel::Student => Role::Student.as_str(),
            FeedbackChannel::Faculty => Role::Faculty.as_str(),
        }
    }
}

// ==========================================
// OutboundMail - 待发送邮件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutboundMail {
    /// 由反馈组装发往管理员的邮件
    pub fn from_feedback(
        to: &str,
        channel: FeedbackChannel,
        uid: &str,
        email: &str,
        feedback: &Feedback,
    ) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("{} {}", channel.subject_prefix(), feedback.subject),
            body: format!(
                "From {} {} ({}):\n\n{}",
                channel.sender_label(),
                uid,
                email,
                feedback.message
            ),
        }
    }
}
