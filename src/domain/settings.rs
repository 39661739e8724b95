// ==========================================
// 高校排课系统 - 全局设置
// ==========================================
// 存储: config_kv (scope_id='global')
// ==========================================

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub admin_feedback_email: Option<String>,
    #[serde(default)]
    pub campus: Option<String>,
    #[serde(default = "default_true")]
    pub enable_instant_notify: bool,
    /// 是否允许调用外部生成式规划器
    #[serde(default = "default_true", rename = "geminiEnabled", alias = "plannerEnabled")]
    pub planner_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_feedback_email: None,
            campus: None,
            enable_instant_notify: true,
            planner_enabled: true,
        }
    }
}

/// 课表网格：可选的上课日与开始时间
///
/// 存储为 config_kv 中 schedule_config 键下的 JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub times: Vec<String>,
}

/// 课表网格更新请求（两个数组都必须给出）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScheduleConfigUpdate {
    #[serde(default)]
    pub days: Option<Vec<String>>,
    #[serde(default)]
    pub times: Option<Vec<String>>,
}

impl ScheduleConfigUpdate {
    /// 缺任一数组返回 None
    pub fn into_config(self) -> Option<ScheduleConfig> {
        Some(ScheduleConfig {
            days: self.days?,
            times: self.times?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_defaults_from_empty_object() {
        let settings: Settings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_wire_names() {
        let settings = Settings {
            admin_feedback_email: Some("admin@gmail.com".to_string()),
            campus: None,
            enable_instant_notify: false,
            planner_enabled: false,
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["adminFeedbackEmail"], "admin@gmail.com");
        assert_eq!(value["enableInstantNotify"], false);
        assert_eq!(value["geminiEnabled"], false);
    }

    #[test]
    fn test_schedule_config_update_requires_both_arrays() {
        let partial: ScheduleConfigUpdate =
            serde_json::from_value(json!({"days": ["Mon", "Tue"]})).unwrap();
        assert_eq!(partial.into_config(), None);

        let full: ScheduleConfigUpdate =
            serde_json::from_value(json!({"days": ["Mon"], "times": ["09:00", "10:00"]})).unwrap();
        let config = full.into_config().unwrap();
        assert_eq!(config.days, vec!["Mon"]);
        assert_eq!(config.times, vec!["09:00", "10:00"]);
    }
}
