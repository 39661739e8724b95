// ==========================================
// 高校排课系统 - 应用层
// ==========================================
// 职责: 依赖装配，供传输层与命令行使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, ENV_DB_PATH};
