// ==========================================
// 高校排课系统 - 全局设置 API（管理员）
// ==========================================

use crate::api::dto::UpdatedAck;
use crate::api::error::{ApiError, ApiResult};
use crate::auth::{Authenticator, RequireRoles};
use crate::config::ConfigManager;
use crate::domain::settings::{ScheduleConfig, ScheduleConfigUpdate, Settings};
use std::sync::Arc;
use tracing::info;

pub struct SettingsApi {
    auth: Arc<Authenticator>,
    config_manager: Arc<ConfigManager>,
}

impl SettingsApi {
    pub fn new(auth: Arc<Authenticator>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            auth,
            config_manager,
        }
    }

    pub async fn get_settings(&self, token: Option<&str>) -> ApiResult<Settings> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        Ok(self.config_manager.get_settings()?)
    }

    pub async fn put_settings(&self, token: Option<&str>, settings: &Settings) -> ApiResult<UpdatedAck> {
        let admin = self.auth.require(token, &RequireRoles::admin_only()).await?;
        self.config_manager.update_settings(settings)?;
        info!(by = %admin.uid, "全局设置已更新");
        Ok(UpdatedAck::ok())
    }

    /// 读取课表网格（未设置时为 None）
    pub async fn get_schedule_config(&self, token: Option<&str>) -> ApiResult<Option<ScheduleConfig>> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        Ok(self.config_manager.get_schedule_config()?)
    }

    /// 覆写课表网格，days 与 times 都必须给出
    pub async fn put_schedule_config(
        &self,
        token: Option<&str>,
        update: ScheduleConfigUpdate,
    ) -> ApiResult<UpdatedAck> {
        let admin = self.auth.require(token, &RequireRoles::admin_only()).await?;
        let config = update
            .into_config()
            .ok_or_else(|| ApiError::InvalidInput("days and times arrays required".to_string()))?;
        self.config_manager.set_schedule_config(&config)?;
        info!(by = %admin.uid, "课表网格已更新");
        Ok(UpdatedAck::ok())
    }
}
