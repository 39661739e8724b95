// ==========================================
// 高校排课系统 - 应用状态
// ==========================================
// 职责: 进程启动时构造一次，持有共享连接、注册表与各 API 实例
// 传输层（HTTP/WebSocket）从这里取用 API，不自行构造依赖
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{FeedbackApi, LeaveApi, ProfileApi, ScheduleApi, SettingsApi, TimetableApi};
use crate::auth::{Authenticator, IdentityVerifier};
use crate::config::{ConfigManager, PlannerConfig, SchedulerConfigReader, SmtpConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{GenerativePlanner, ScheduleOrchestrator};
use crate::notify::{
    MailTransport, NotificationRegistry, NotificationSession, OutboxMailTransport, SmtpMailTransport,
};
use crate::repository::{LeaveRepository, MailOutboxRepository, TimetableRepository, UserRepository};

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "EDU_SCHEDULER_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 实时通知连接注册表（全进程唯一）
    pub registry: Arc<NotificationRegistry>,

    /// 调用者认证
    pub authenticator: Arc<Authenticator>,

    /// 配置管理
    pub config_manager: Arc<ConfigManager>,

    /// 排课 API
    pub schedule_api: Arc<ScheduleApi<ConfigManager>>,

    /// 课表文档 API
    pub timetable_api: Arc<TimetableApi>,

    /// 用户档案 API
    pub profile_api: Arc<ProfileApi>,

    /// 请假 API
    pub leave_api: Arc<LeaveApi>,

    /// 全局设置 API
    pub settings_api: Arc<SettingsApi>,

    /// 意见反馈 API
    pub feedback_api: Arc<FeedbackApi>,

    /// 通知会话（WebSocket 连接处理）
    pub notification_session: Arc<NotificationSession>,
}

impl AppState {
    /// 创建新的AppState实例（规划器与 SMTP 配置取自环境变量）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - verifier: 身份令牌校验实现
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String, verifier: Arc<dyn IdentityVerifier>) -> Result<Self, String> {
        let planner_config = PlannerConfig::from_env();
        let planner = GenerativePlanner::from_config(&planner_config)
            .map_err(|e| format!("无法创建生成式规划器: {}", e))?;
        Self::with_services(
            db_path,
            verifier,
            planner,
            planner_config.timeout,
            SmtpConfig::from_env(),
        )
    }

    /// 使用指定规划器创建AppState（邮件只入待发箱）
    pub fn with_planner(
        db_path: String,
        verifier: Arc<dyn IdentityVerifier>,
        planner: GenerativePlanner,
        planner_timeout: Duration,
    ) -> Result<Self, String> {
        Self::with_services(db_path, verifier, planner, planner_timeout, None)
    }

    /// 使用指定规划器与邮件配置创建AppState
    ///
    /// smtp 为 None 时反馈邮件写入待发箱
    pub fn with_services(
        db_path: String,
        verifier: Arc<dyn IdentityVerifier>,
        planner: GenerativePlanner,
        planner_timeout: Duration,
        smtp: Option<SmtpConfig>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 共享连接 + 建表
        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repository / Config
        // ==========================================
        let timetable_repo = Arc::new(TimetableRepository::from_connection(conn.clone()));
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));
        let leave_repo = Arc::new(LeaveRepository::from_connection(conn.clone()));
        let outbox_repo = Arc::new(MailOutboxRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn SchedulerConfigReader> = config_manager.clone();

        // ==========================================
        // 认证 / 通知 / 引擎
        // ==========================================
        let authenticator = Arc::new(Authenticator::new(verifier, user_repo.clone()));
        let registry = Arc::new(NotificationRegistry::new());
        let mailer: Arc<dyn MailTransport> = match smtp {
            Some(smtp) => {
                tracing::info!(host = %smtp.host, port = smtp.port, "反馈邮件经 SMTP 发送");
                Arc::new(
                    SmtpMailTransport::new(&smtp)
                        .map_err(|e| format!("无法创建SMTP发送端: {}", e))?,
                )
            }
            None => {
                tracing::warn!("未配置 SMTP，反馈邮件仅写入待发箱");
                Arc::new(OutboxMailTransport::new(outbox_repo))
            }
        };

        tracing::info!(
            planner_configured = planner.is_configured(),
            model = planner.model(),
            timeout_secs = planner_timeout.as_secs(),
            "排课编排器就绪"
        );
        let orchestrator = Arc::new(ScheduleOrchestrator::new(
            config_manager.clone(),
            planner,
            planner_timeout,
        ));

        // ==========================================
        // API
        // ==========================================
        let schedule_api = Arc::new(ScheduleApi::new(
            authenticator.clone(),
            orchestrator,
            timetable_repo.clone(),
        ));
        let timetable_api = Arc::new(TimetableApi::new(authenticator.clone(), timetable_repo));
        let profile_api = Arc::new(ProfileApi::new(authenticator.clone(), user_repo));
        let leave_api = Arc::new(LeaveApi::new(
            authenticator.clone(),
            leave_repo,
            registry.clone(),
            config_reader.clone(),
        ));
        let settings_api = Arc::new(SettingsApi::new(authenticator.clone(), config_manager.clone()));
        let feedback_api = Arc::new(FeedbackApi::new(authenticator.clone(), config_reader, mailer));
        let notification_session = Arc::new(NotificationSession::new(
            registry.clone(),
            authenticator.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            registry,
            authenticator,
            config_manager,
            schedule_api,
            timetable_api,
            profile_api,
            leave_api,
            settings_api,
            feedback_api,
            notification_session,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: EDU_SCHEDULER_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./edu_scheduler.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("edu-scheduler");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("edu_scheduler.db");
        }
    }

    path.to_string_lossy().to_string()
}
