// ==========================================
// 高校排课系统 - 身份令牌校验接口
// ==========================================
// 外部身份提供方通过实现 IdentityVerifier 接入
// ==========================================

use crate::auth::claims::IdentityClaims;
use crate::auth::AuthError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// 校验令牌并返回声明（签名/过期等由实现负责）
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError>;
}

// ==========================================
// StaticTokenVerifier - 预登记令牌校验
// ==========================================
// 用于本地联调与测试：令牌与声明一一登记
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: RwLock<HashMap<String, IdentityClaims>>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, token: &str, claims: IdentityClaims) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), claims);
    }

    pub fn revoke(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken("令牌未登记".to_string()))
    }
}
