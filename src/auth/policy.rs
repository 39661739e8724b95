// ==========================================
// 高校排课系统 - 角色访问策略
// ==========================================
// 角色判定与业务逻辑分离：接口层按策略校验调用者角色
// ==========================================

use crate::auth::AuthError;
use crate::domain::types::Role;
use crate::domain::user::UserProfile;

/// 访问策略（基于调用者角色的谓词）
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, role: Role) -> bool;

    /// 用于日志与错误信息
    fn describe(&self) -> String;

    /// 校验调用者，不满足时返回 Forbidden
    fn authorize(&self, caller: &UserProfile) -> Result<(), AuthError> {
        if self.allows(caller.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                role: caller.role,
                required: self.describe(),
            })
        }
    }
}

/// 允许指定角色集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireRoles {
    roles: Vec<Role>,
}

impl RequireRoles {
    pub fn new(roles: &[Role]) -> Self {
        Self {
            roles: roles.to_vec(),
        }
    }

    pub fn admin_only() -> Self {
        Self::new(&[Role::Admin])
    }

    pub fn faculty_or_admin() -> Self {
        Self::new(&[Role::Faculty, Role::Admin])
    }

    pub fn student_or_admin() -> Self {
        Self::new(&[Role::Student, Role::Admin])
    }
}

impl AccessPolicy for RequireRoles {
    fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    fn describe(&self) -> String {
        self.roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// 任意已登录用户
#[derive(Debug, Default, Clone, Copy)]
pub struct AnySignedIn;

impl AccessPolicy for AnySignedIn {
    fn allows(&self, _role: Role) -> bool {
        true
    }

    fn describe(&self) -> String {
        "any".to_string()
    }
}
