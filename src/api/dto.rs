// ==========================================
// 高校排课系统 - API 响应 DTO
// ==========================================

use crate::engine::{FallbackReason, GenerationSource};
use crate::domain::timetable::Timetable;
use crate::notify::MailDelivery;
use serde::{Deserialize, Serialize};

/// 更新确认 {updated: true}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedAck {
    pub updated: bool,
}

impl UpdatedAck {
    pub fn ok() -> Self {
        Self { updated: true }
    }
}

/// 删除确认
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedAck {
    pub deleted: bool,
}

/// 请假提交确认
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSubmittedAck {
    pub submitted: bool,
    pub leave_id: String,
    /// 收到广播的连接数（未开启即时通知时为 0）
    pub notified: usize,
}

/// 反馈投递确认
///
/// sent 仅在邮件已交给 SMTP 服务器时为 true；入待发箱时 queued 为 true
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentAck {
    pub sent: bool,
    #[serde(default)]
    pub queued: bool,
}

impl From<MailDelivery> for SentAck {
    fn from(delivery: MailDelivery) -> Self {
        match delivery {
            MailDelivery::Sent => Self { sent: true, queued: false },
            MailDelivery::Queued => Self { sent: false, queued: true },
        }
    }
}

/// 带来源说明的排课结果
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleGenerationView {
    pub options: Vec<Timetable>,
    pub source: GenerationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}
