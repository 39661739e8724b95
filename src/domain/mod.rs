// ==========================================
// 高校排课系统 - 领域模型层
// ==========================================
// 职责: 定义课程、课表、排课请求、冲突、用户档案等实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod conflict;
pub mod course;
pub mod feedback;
pub mod leave;
pub mod schedule_request;
pub mod settings;
pub mod timetable;
pub mod types;
pub mod user;

// 重导出核心类型
pub use conflict::{
    ConflictReport, ConflictResolutionRequest, ConflictResolutionResult, ConflictSuggestion,
    SuggestedPlacement,
};
pub use course::Course;
pub use feedback::{Feedback, FeedbackChannel, OutboundMail};
pub use leave::{LeaveRecord, LeaveRequest};
pub use schedule_request::{ScheduleRequest, ScheduleResult};
pub use settings::{ScheduleConfig, ScheduleConfigUpdate, Settings};
pub use timetable::{Timetable, TimetableSlot};
pub use types::{Role, WorkDay};
pub use user::UserProfile;
