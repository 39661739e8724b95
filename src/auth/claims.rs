// ==========================================
// 高校排课系统 - 身份声明与登录规则
// ==========================================
// 规则: 邮箱已验证 + 通过 google.com 登录 + @gmail.com 邮箱
// ==========================================

use crate::auth::AuthError;
use serde::{Deserialize, Serialize};

pub const REQUIRED_PROVIDER: &str = "google.com";
pub const REQUIRED_EMAIL_DOMAIN: &str = "@gmail.com";

/// 身份提供方校验后的声明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    pub uid: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub sign_in_provider: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl IdentityClaims {
    /// 校验登录规则
    pub fn check_sign_in(&self) -> Result<(), AuthError> {
        if self.uid.trim().is_empty() {
            return Err(AuthError::MissingUid);
        }
        if !self.email_verified {
            return Err(AuthError::EmailNotVerified);
        }
        let provider_ok = self.sign_in_provider.as_deref() == Some(REQUIRED_PROVIDER);
        let email_ok = self
            .email
            .as_deref()
            .is_some_and(|e| e.ends_with(REQUIRED_EMAIL_DOMAIN));
        if !provider_ok || !email_ok {
            return Err(AuthError::GmailSignInRequired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> IdentityClaims {
        IdentityClaims {
            uid: "u1".to_string(),
            email_verified: true,
            sign_in_provider: Some("google.com".to_string()),
            email: Some("someone@gmail.com".to_string()),
            display_name: None,
            photo_url: None,
        }
    }

    #[test]
    fn test_valid_gmail_sign_in() {
        assert!(claims().check_sign_in().is_ok());
    }

    #[test]
    fn test_unverified_email() {
        let mut c = claims();
        c.email_verified = false;
        assert!(matches!(c.check_sign_in(), Err(AuthError::EmailNotVerified)));
    }

    #[test]
    fn test_other_provider_or_domain() {
        let mut c = claims();
        c.sign_in_provider = Some("password".to_string());
        assert!(matches!(c.check_sign_in(), Err(AuthError::GmailSignInRequired)));

        let mut c = claims();
        c.email = Some("someone@university.edu".to_string());
        assert!(matches!(c.check_sign_in(), Err(AuthError::GmailSignInRequired)));

        let mut c = claims();
        c.email = None;
        assert!(matches!(c.check_sign_in(), Err(AuthError::GmailSignInRequired)));
    }

    #[test]
    fn test_blank_uid() {
        let mut c = claims();
        c.uid = " ".to_string();
        assert!(matches!(c.check_sign_in(), Err(AuthError::MissingUid)));
    }
}
