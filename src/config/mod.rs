// ==========================================
// 高校排课系统 - 配置层
// ==========================================
// 职责: 全局设置管理 (config_kv 表) 与规划器/邮件环境配置
// ==========================================

pub mod config_manager;
pub mod planner_config;
pub mod scheduler_config_trait;
pub mod smtp_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use planner_config::PlannerConfig;
pub use scheduler_config_trait::{ConfigReadError, SchedulerConfigReader};
pub use smtp_config::SmtpConfig;
