// ==========================================
// 高校排课系统 - 排课 API
// ==========================================
// 职责: 生成候选课表、冲突建议、冲突检测
// 权限: 仅管理员
// ==========================================

use crate::api::dto::ScheduleGenerationView;
use crate::api::error::{ApiError, ApiResult};
use crate::auth::{Authenticator, RequireRoles};
use crate::config::SchedulerConfigReader;
use crate::domain::conflict::{ConflictResolutionRequest, ConflictResolutionResult};
use crate::domain::schedule_request::{ScheduleRequest, ScheduleResult};
use crate::engine::{ConflictDetector, ConflictResolver, DetectedConflict, ScheduleOrchestrator};
use crate::repository::TimetableRepository;
use std::sync::Arc;
use tracing::info;

pub struct ScheduleApi<C>
where
    C: SchedulerConfigReader,
{
    auth: Arc<Authenticator>,
    orchestrator: Arc<ScheduleOrchestrator<C>>,
    timetables: Arc<TimetableRepository>,
    resolver: ConflictResolver,
    detector: ConflictDetector,
}

impl<C> ScheduleApi<C>
where
    C: SchedulerConfigReader,
{
    pub fn new(
        auth: Arc<Authenticator>,
        orchestrator: Arc<ScheduleOrchestrator<C>>,
        timetables: Arc<TimetableRepository>,
    ) -> Self {
        Self {
            auth,
            orchestrator,
            timetables,
            resolver: ConflictResolver::new(),
            detector: ConflictDetector::new(),
        }
    }

    /// 生成候选课表
    ///
    /// # 返回
    /// - Ok(ScheduleResult): 候选方案（规划器或启发式，二者之一）
    pub async fn generate(&self, token: Option<&str>, req: &ScheduleRequest) -> ApiResult<ScheduleResult> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        let options = self.orchestrator.generate(req).await;
        Ok(ScheduleResult { options })
    }

    /// 生成候选课表，并说明来源与回退原因
    pub async fn generate_with_report(
        &self,
        token: Option<&str>,
        req: &ScheduleRequest,
    ) -> ApiResult<ScheduleGenerationView> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        let report = self.orchestrator.generate_with_report(req).await;
        Ok(ScheduleGenerationView {
            options: report.options,
            source: report.source,
            fallback_reason: report.fallback_reason,
        })
    }

    /// 为冲突给出调整建议
    pub async fn resolve_conflicts(
        &self,
        token: Option<&str>,
        req: &ConflictResolutionRequest,
    ) -> ApiResult<ConflictResolutionResult> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        Ok(self.resolver.resolve_request(req))
    }

    /// 检测已存储课表中的时间冲突
    pub async fn detect_conflicts(
        &self,
        token: Option<&str>,
        timetable_id: &str,
    ) -> ApiResult<Vec<DetectedConflict>> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        let timetable = self
            .timetables
            .find_by_id(timetable_id)?
            .ok_or_else(|| ApiError::NotFound(format!("课表(id={})不存在", timetable_id)))?;

        let conflicts = self.detector.detect(&timetable);
        info!(timetable_id, conflicts = conflicts.len(), "课表冲突检测完成");
        Ok(conflicts)
    }
}
