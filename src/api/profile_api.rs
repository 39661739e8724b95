// ==========================================
// 高校排课系统 - 用户档案 API
// ==========================================

use crate::api::dto::UpdatedAck;
use crate::api::error::{ApiError, ApiResult};
use crate::auth::{AnySignedIn, Authenticator, RequireRoles};
use crate::domain::types::Role;
use crate::domain::user::UserProfile;
use crate::repository::UserRepository;
use std::sync::Arc;
use tracing::info;

pub struct ProfileApi {
    auth: Arc<Authenticator>,
    users: Arc<UserRepository>,
}

impl ProfileApi {
    pub fn new(auth: Arc<Authenticator>, users: Arc<UserRepository>) -> Self {
        Self { auth, users }
    }

    /// 当前用户档案（首次登录时自动创建）
    pub async fn me(&self, token: Option<&str>) -> ApiResult<UserProfile> {
        Ok(self.auth.require(token, &AnySignedIn).await?)
    }

    /// 更新本人档案
    ///
    /// 角色不可自行修改：写入时保留现有角色
    pub async fn update_profile(&self, token: Option<&str>, payload: &UserProfile) -> ApiResult<UpdatedAck> {
        let caller = self.auth.require(token, &AnySignedIn).await?;
        if payload.uid != caller.uid {
            return Err(ApiError::Forbidden("不能修改他人档案".to_string()));
        }

        let mut profile = payload.clone();
        profile.role = caller.role;
        self.users.upsert(&profile)?;
        info!(uid = %caller.uid, "用户档案已更新");
        Ok(UpdatedAck::ok())
    }

    /// 设置用户角色（管理员）
    pub async fn set_role(&self, token: Option<&str>, uid: &str, role: &str) -> ApiResult<UpdatedAck> {
        let admin = self.auth.require(token, &RequireRoles::admin_only()).await?;
        let role = Role::parse(role)
            .ok_or_else(|| ApiError::InvalidInput(format!("无效角色: {}", role)))?;
        self.users.set_role(uid, role)?;
        info!(uid, role = %role, by = %admin.uid, "用户角色已变更");
        Ok(UpdatedAck::ok())
    }
}
