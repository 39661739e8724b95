// ==========================================
// 高校排课系统 - 请假 API
// ==========================================
// 流程: 持久化请假记录 -> （开启即时通知时）广播公告
// ==========================================

use crate::api::dto::LeaveSubmittedAck;
use crate::api::error::{ApiError, ApiResult};
use crate::auth::{Authenticator, RequireRoles};
use crate::config::SchedulerConfigReader;
use crate::domain::leave::{LeaveRecord, LeaveRequest};
use crate::notify::NotificationRegistry;
use crate::repository::LeaveRepository;
use std::sync::Arc;
use tracing::{info, warn};

pub struct LeaveApi {
    auth: Arc<Authenticator>,
    leaves: Arc<LeaveRepository>,
    registry: Arc<NotificationRegistry>,
    config: Arc<dyn SchedulerConfigReader>,
}

impl LeaveApi {
    pub fn new(
        auth: Arc<Authenticator>,
        leaves: Arc<LeaveRepository>,
        registry: Arc<NotificationRegistry>,
        config: Arc<dyn SchedulerConfigReader>,
    ) -> Self {
        Self {
            auth,
            leaves,
            registry,
            config,
        }
    }

    /// 提交请假
    pub async fn request_leave(&self, token: Option<&str>, req: &LeaveRequest) -> ApiResult<LeaveSubmittedAck> {
        let caller = self.auth.require(token, &RequireRoles::faculty_or_admin()).await?;
        if req.dates.is_empty() {
            return Err(ApiError::InvalidInput("请假日期不能为空".to_string()));
        }

        let record = self.leaves.insert(&caller.uid, req)?;
        info!(leave_id = %record.id, uid = %caller.uid, days = req.dates.len(), "请假已登记");

        let instant = self.config.is_instant_notify_enabled().await.unwrap_or_else(|e| {
            warn!(error = %e, "读取即时通知开关失败，按开启处理");
            true
        });

        let notified = if instant {
            self.registry.broadcast(&req.announcement(&caller.uid)).await
        } else {
            0
        };

        Ok(LeaveSubmittedAck {
            submitted: true,
            leave_id: record.id,
            notified,
        })
    }

    /// 本人的请假记录（按教师标识查询）
    pub async fn my_leaves(&self, token: Option<&str>) -> ApiResult<Vec<LeaveRecord>> {
        let caller = self.auth.require(token, &RequireRoles::faculty_or_admin()).await?;
        Ok(self.leaves.list_by_faculty(caller.faculty_key())?)
    }
}
