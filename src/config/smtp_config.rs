// ==========================================
// 高校排课系统 - 邮件发送环境配置
// ==========================================
// SMTP_HOST  服务器地址（必填）
// SMTP_PORT  端口，默认 587（STARTTLS）
// SMTP_USER  登录用户（必填）
// SMTP_PASS  登录密码（必填）
// SMTP_FROM  发件人，缺省为 SMTP_USER
// 三个必填项任一缺失即视为未配置
// ==========================================

use tracing::warn;

pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";
pub const ENV_SMTP_FROM: &str = "SMTP_FROM";

pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
}

// 不输出密码
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("sender", &self.sender)
            .finish()
    }
}

impl SmtpConfig {
    /// 从进程环境读取；未配置返回 None
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = non_blank(ENV_SMTP_HOST)?;
        let username = non_blank(ENV_SMTP_USER)?;
        let password = non_blank(ENV_SMTP_PASS)?;

        let port = match non_blank(ENV_SMTP_PORT) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    warn!(key = ENV_SMTP_PORT, raw_value = %raw, "配置格式错误，使用默认值");
                    DEFAULT_SMTP_PORT
                }
            },
            None => DEFAULT_SMTP_PORT,
        };

        let sender = non_blank(ENV_SMTP_FROM).unwrap_or_else(|| username.clone());

        Some(Self {
            host,
            port,
            username,
            password,
            sender,
        })
    }
}
