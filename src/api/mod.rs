// ==========================================
// 高校排课系统 - API 层
// ==========================================
// 职责: 每个业务入口一个方法，先认证/鉴权再调用下层
// 调用方（HTTP/WebSocket 传输层）只需传入令牌与请求体
// ==========================================

pub mod dto;
pub mod error;
pub mod feedback_api;
pub mod leave_api;
pub mod profile_api;
pub mod schedule_api;
pub mod settings_api;
pub mod timetable_api;

// 重导出核心类型
pub use dto::{DeletedAck, LeaveSubmittedAck, ScheduleGenerationView, SentAck, UpdatedAck};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use feedback_api::FeedbackApi;
pub use leave_api::LeaveApi;
pub use profile_api::ProfileApi;
pub use schedule_api::ScheduleApi;
pub use settings_api::SettingsApi;
pub use timetable_api::TimetableApi;
