// ==========================================
// 高校排课系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod leave_repo;
pub mod mail_outbox_repo;
pub mod timetable_repo;
pub mod user_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use leave_repo::LeaveRepository;
pub use mail_outbox_repo::{MailOutboxRepository, OutboxEntry};
pub use timetable_repo::TimetableRepository;
pub use user_repo::UserRepository;
