// ==========================================
// 高校排课系统 - 规划器环境配置
// ==========================================
// 来源: 进程环境变量
// GEMINI_API_KEY       模型凭据（空白视为未配置）
// GEMINI_MODEL         模型名
// GEMINI_ENDPOINT      API 根地址
// PLANNER_TEMPERATURE  采样温度
// PLANNER_TIMEOUT_SECS 单次调用超时
// ==========================================

use std::time::Duration;
use tracing::warn;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_ENDPOINT: &str = "GEMINI_ENDPOINT";
pub const ENV_TEMPERATURE: &str = "PLANNER_TEMPERATURE";
pub const ENV_TIMEOUT_SECS: &str = "PLANNER_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PlannerConfig {
    /// 从进程环境读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（数值非法时回退默认值并告警）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let temperature = match non_blank(ENV_TEMPERATURE) {
            Some(raw) => raw.parse::<f32>().unwrap_or_else(|_| {
                warn!(key = ENV_TEMPERATURE, raw_value = %raw, "配置格式错误，使用默认值");
                DEFAULT_TEMPERATURE
            }),
            None => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match non_blank(ENV_TIMEOUT_SECS) {
            // 0 秒超时会让每次调用都失败，按非法值处理
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(key = ENV_TIMEOUT_SECS, raw_value = %raw, "配置格式错误，使用默认值");
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_key: non_blank(ENV_API_KEY),
            model: non_blank(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: non_blank(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 是否具备调用模型的凭据
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}
