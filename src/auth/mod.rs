// ==========================================
// 高校排课系统 - 认证与授权
// ==========================================
// 职责: 令牌校验、登录规则、首次登录建档、角色策略
// ==========================================

pub mod authenticator;
pub mod claims;
pub mod policy;
pub mod verifier;

use crate::domain::types::Role;
use crate::repository::RepositoryError;
use thiserror::Error;

pub use authenticator::Authenticator;
pub use claims::IdentityClaims;
pub use policy::{AccessPolicy, AnySignedIn, RequireRoles};
pub use verifier::{IdentityVerifier, StaticTokenVerifier};

/// 认证/授权错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("缺少认证令牌")]
    MissingToken,

    #[error("令牌无效: {0}")]
    InvalidToken(String),

    #[error("令牌缺少 uid")]
    MissingUid,

    #[error("邮箱未验证")]
    EmailNotVerified,

    #[error("必须使用 Gmail 账号通过 Google 登录")]
    GmailSignInRequired,

    #[error("权限不足: role={role}, 需要 {required}")]
    Forbidden { role: Role, required: String },

    #[error("档案读取失败: {0}")]
    Repository(#[from] RepositoryError),
}
