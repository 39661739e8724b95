// ==========================================
// 高校排课系统 - 运行配置读取 Trait
// ==========================================
// 职责: 定义编排器与接口层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigReadError = Box<dyn Error + Send + Sync>;

// ==========================================
// SchedulerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SchedulerConfigReader: Send + Sync {
    /// 是否允许调用外部生成式规划器
    ///
    /// # 默认值
    /// - true
    async fn is_planner_enabled(&self) -> Result<bool, ConfigReadError>;

    /// 请假提交后是否即时广播通知
    ///
    /// # 默认值
    /// - true
    async fn is_instant_notify_enabled(&self) -> Result<bool, ConfigReadError>;

    /// 接收反馈邮件的管理员邮箱
    ///
    /// # 返回
    /// - None: 未配置（反馈接口不可用）
    async fn get_admin_feedback_email(&self) -> Result<Option<String>, ConfigReadError>;

    /// 校区名称
    async fn get_campus(&self) -> Result<Option<String>, ConfigReadError>;
}
