// ==========================================
// 高校排课系统 - 排课编排器
// ==========================================
// 策略: 先尝试外部规划器，非空结果原样返回
//       失败/超时/空结果/未启用 一律回退启发式生成器
// 红线: 不合并两种生成器的结果，不重试规划器，整体不失败
// ==========================================

use crate::config::SchedulerConfigReader;
use crate::domain::schedule_request::ScheduleRequest;
use crate::domain::timetable::Timetable;
use crate::engine::heuristic::HeuristicGenerator;
use crate::engine::planner::{GenerativePlanner, PlannerError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// ==========================================
// GenerationReport - 生成结果与来源
// ==========================================

/// 候选方案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Planner,
    Heuristic,
}

/// 回退原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// 请求未要求使用规划器
    RequestOptOut,
    /// 全局设置关闭了规划器
    DisabledBySettings,
    /// 未配置模型凭据
    NotConfigured,
    /// 规划器返回空列表
    EmptyResult,
    /// 规划器调用失败
    PlannerFailed(String),
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub options: Vec<Timetable>,
    pub source: GenerationSource,
    pub fallback_reason: Option<FallbackReason>,
}

// ==========================================
// ScheduleOrchestrator - 排课编排器
// ==========================================
pub struct ScheduleOrchestrator<C>
where
    C: SchedulerConfigReader,
{
    config: Arc<C>,
    planner: GenerativePlanner,
    heuristic: HeuristicGenerator,
    planner_timeout: Duration,
}

impl<C> ScheduleOrchestrator<C>
where
    C: SchedulerConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - planner: 生成式规划器（可为未配置状态）
    /// - planner_timeout: 单次规划器调用超时
    pub fn new(config: Arc<C>, planner: GenerativePlanner, planner_timeout: Duration) -> Self {
        Self {
            config,
            planner,
            heuristic: HeuristicGenerator::new(),
            planner_timeout,
        }
    }

    /// 生成候选课表（保证非空）
    pub async fn generate(&self, req: &ScheduleRequest) -> Vec<Timetable> {
        self.generate_with_report(req).await.options
    }

    /// 生成候选课表并返回来源与回退原因
    pub async fn generate_with_report(&self, req: &ScheduleRequest) -> GenerationReport {
        match self.try_planner(req).await {
            Ok(options) => {
                info!(
                    department = %req.department,
                    model = %self.planner.model(),
                    options = options.len(),
                    "使用规划器结果"
                );
                GenerationReport {
                    options,
                    source: GenerationSource::Planner,
                    fallback_reason: None,
                }
            }
            Err(reason) => {
                let options = self.heuristic.generate(req);
                info!(
                    department = %req.department,
                    reason = ?reason,
                    options = options.len(),
                    "回退到启发式生成器"
                );
                GenerationReport {
                    options,
                    source: GenerationSource::Heuristic,
                    fallback_reason: Some(reason),
                }
            }
        }
    }

    /// 尝试规划器；任何不可用情形都以回退原因返回
    async fn try_planner(&self, req: &ScheduleRequest) -> Result<Vec<Timetable>, FallbackReason> {
        if !req.use_planner {
            return Err(FallbackReason::RequestOptOut);
        }

        let enabled = match self.config.is_planner_enabled().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "读取规划器开关失败，按默认开启处理");
                true
            }
        };
        if !enabled {
            return Err(FallbackReason::DisabledBySettings);
        }

        if !self.planner.is_configured() {
            return Err(FallbackReason::NotConfigured);
        }

        let outcome = match tokio::time::timeout(self.planner_timeout, self.planner.plan(req)).await
        {
            Ok(result) => result,
            Err(_) => Err(PlannerError::Timeout(self.planner_timeout.as_secs())),
        };

        match outcome {
            Ok(options) if !options.is_empty() => Ok(options),
            Ok(_) => Err(FallbackReason::EmptyResult),
            Err(e) => {
                warn!(error = %e, model = %self.planner.model(), "规划器不可用");
                Err(FallbackReason::PlannerFailed(e.to_string()))
            }
        }
    }
}
