// ==========================================
// 高校排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 核心: 课表生成（外部规划器 + 启发式回退）与冲突处理
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 生成、编排、冲突
pub mod engine;

// 导入层 - 课程目录
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// 认证与授权
pub mod auth;

// 通知层 - 实时推送与邮件
pub mod notify;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ConflictReport, ConflictSuggestion, Course, Role, ScheduleRequest, ScheduleResult, Timetable,
    TimetableSlot, UserProfile,
};

pub use engine::{ConflictDetector, ConflictResolver, HeuristicGenerator, ScheduleOrchestrator};

pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "高校排课系统";
