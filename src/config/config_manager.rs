// ==========================================
// 高校排课系统 - 配置管理器
// ==========================================
// 职责: 全局设置的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::scheduler_config_trait::{ConfigReadError, SchedulerConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::settings::{ScheduleConfig, Settings};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigReadError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigReadError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global 配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, ConfigReadError> {
        Ok(match self.get_global_config_value(key)? {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warn!(config_key = key, raw_value = %raw, "布尔配置格式错误，使用默认值");
                default
            }),
            None => default,
        })
    }

    fn get_non_empty(&self, key: &str) -> Result<Option<String>, ConfigReadError> {
        Ok(self
            .get_global_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// 读取完整设置
    pub fn get_settings(&self) -> Result<Settings, ConfigReadError> {
        Ok(Settings {
            admin_feedback_email: self.get_non_empty(config_keys::ADMIN_FEEDBACK_EMAIL)?,
            campus: self.get_non_empty(config_keys::CAMPUS)?,
            enable_instant_notify: self.get_bool_or_default(config_keys::ENABLE_INSTANT_NOTIFY, true)?,
            planner_enabled: self.get_bool_or_default(config_keys::PLANNER_ENABLED, true)?,
        })
    }

    /// 整体覆写设置（None 字段删除对应键）
    pub fn update_settings(&self, settings: &Settings) -> Result<(), ConfigReadError> {
        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let optional = [
            (config_keys::ADMIN_FEEDBACK_EMAIL, settings.admin_feedback_email.as_deref()),
            (config_keys::CAMPUS, settings.campus.as_deref()),
        ];
        for (key, value) in optional {
            match value {
                Some(v) => {
                    tx.execute(
                        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                         ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                        params![key, v],
                    )?;
                }
                None => {
                    tx.execute(
                        "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                        params![key],
                    )?;
                }
            }
        }

        let flags = [
            (config_keys::ENABLE_INSTANT_NOTIFY, settings.enable_instant_notify),
            (config_keys::PLANNER_ENABLED, settings.planner_enabled),
        ];
        for (key, value) in flags {
            tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value.to_string()],
            )?;
        }

        tx.commit()?;
        info!(
            enable_instant_notify = settings.enable_instant_notify,
            planner_enabled = settings.planner_enabled,
            has_admin_email = settings.admin_feedback_email.is_some(),
            "全局设置已更新"
        );
        Ok(())
    }

    /// 读取课表网格；未设置或存储内容损坏时返回 None
    pub fn get_schedule_config(&self) -> Result<Option<ScheduleConfig>, ConfigReadError> {
        let Some(raw) = self.get_global_config_value(config_keys::SCHEDULE_CONFIG)? else {
            return Ok(None);
        };
        match serde_json::from_str::<ScheduleConfig>(&raw) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                warn!(config_key = config_keys::SCHEDULE_CONFIG, error = %e, "课表网格配置损坏，忽略");
                Ok(None)
            }
        }
    }

    /// 覆写课表网格
    pub fn set_schedule_config(&self, config: &ScheduleConfig) -> Result<(), ConfigReadError> {
        let raw = serde_json::to_string(config)?;
        self.set_global_config_value(config_keys::SCHEDULE_CONFIG, &raw)?;
        info!(days = config.days.len(), times = config.times.len(), "课表网格已更新");
        Ok(())
    }
}

/// 宽松布尔解析
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// SchedulerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SchedulerConfigReader for ConfigManager {
    async fn is_planner_enabled(&self) -> Result<bool, ConfigReadError> {
        self.get_bool_or_default(config_keys::PLANNER_ENABLED, true)
    }

    async fn is_instant_notify_enabled(&self) -> Result<bool, ConfigReadError> {
        self.get_bool_or_default(config_keys::ENABLE_INSTANT_NOTIFY, true)
    }

    async fn get_admin_feedback_email(&self) -> Result<Option<String>, ConfigReadError> {
        self.get_non_empty(config_keys::ADMIN_FEEDBACK_EMAIL)
    }

    async fn get_campus(&self) -> Result<Option<String>, ConfigReadError> {
        self.get_non_empty(config_keys::CAMPUS)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const ADMIN_FEEDBACK_EMAIL: &str = "admin_feedback_email";
    pub const CAMPUS: &str = "campus";
    pub const ENABLE_INSTANT_NOTIFY: &str = "enable_instant_notify";
    pub const PLANNER_ENABLED: &str = "planner_enabled";
    pub const SCHEDULE_CONFIG: &str = "schedule_config";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_schedule_config_round_trip_and_corruption() {
        let manager = memory_manager();
        assert_eq!(manager.get_schedule_config().unwrap(), None);

        let config = ScheduleConfig {
            days: vec!["Mon".to_string(), "Wed".to_string()],
            times: vec!["09:00".to_string()],
        };
        manager.set_schedule_config(&config).unwrap();
        assert_eq!(manager.get_schedule_config().unwrap(), Some(config));

        manager
            .set_global_config_value(config_keys::SCHEDULE_CONFIG, "not json")
            .unwrap();
        assert_eq!(manager.get_schedule_config().unwrap(), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
