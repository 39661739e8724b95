// ==========================================
// 高校排课系统 - 调用者认证
// ==========================================
// 流程: 令牌 -> 声明 -> 登录规则 -> 档案（首次登录自动建 student 档案）
// ==========================================

use crate::auth::claims::IdentityClaims;
use crate::auth::policy::AccessPolicy;
use crate::auth::verifier::IdentityVerifier;
use crate::auth::AuthError;
use crate::domain::user::UserProfile;
use crate::repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Authenticator {
    verifier: Arc<dyn IdentityVerifier>,
    users: Arc<UserRepository>,
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, users: Arc<UserRepository>) -> Self {
        Self { verifier, users }
    }

    /// 校验令牌并检查登录规则（不读写档案）
    pub async fn verify_token(&self, token: Option<&str>) -> Result<IdentityClaims, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let claims = self.verifier.verify(token).await?;
        claims.check_sign_in()?;
        Ok(claims)
    }

    /// 认证调用者并返回其档案
    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserProfile, AuthError> {
        let claims = self.verify_token(token).await?;

        if let Some(profile) = self.users.find_by_uid(&claims.uid)? {
            debug!(uid = %profile.uid, role = %profile.role, "调用者认证通过");
            return Ok(profile);
        }

        let fresh = UserProfile::first_sign_in(
            &claims.uid,
            claims.email.as_deref().unwrap_or_default(),
            claims.display_name.clone(),
            claims.photo_url.clone(),
        );
        let profile = self.users.insert_if_absent(&fresh)?;
        info!(uid = %profile.uid, "首次登录，已创建 student 档案");
        Ok(profile)
    }

    /// 认证并按策略校验角色
    pub async fn require(
        &self,
        token: Option<&str>,
        policy: &dyn AccessPolicy,
    ) -> Result<UserProfile, AuthError> {
        let profile = self.authenticate(token).await?;
        policy.authorize(&profile)?;
        Ok(profile)
    }
}
