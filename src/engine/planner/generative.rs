// ==========================================
// 高校排课系统 - 外部生成式规划器适配
// ==========================================
// 流程: 构造提示词 -> 调用模型 -> 提取 JSON -> 逐字段重建课表
// 红线: 模型输出只对时段内容负责；索引一律重新计算
// 红线: 任一时段缺字段/类型不符则整次调用失败，不返回部分结果
// ==========================================

use crate::config::planner_config::PlannerConfig;
use crate::domain::schedule_request::ScheduleRequest;
use crate::domain::timetable::{Timetable, TimetableSlot};
use crate::engine::planner::gemini::GeminiClient;
use crate::engine::planner::json_extract::{BalancedBraceExtractor, JsonExtractor};
use crate::engine::planner::llm_client::{truncate_for_log, LlmClient, LlmError, LlmRequest};
use crate::engine::planner::prompt::build_prompt;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const MAX_LLM_OUTPUT_LOG_CHARS: usize = 4_000;

/// 规划器失败类型（调用方统一视为“规划器不可用”）
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("模型调用失败: {0}")]
    Transport(#[from] LlmError),

    #[error("模型输出中没有 JSON 对象")]
    NoJsonObject,

    #[error("模型输出 JSON 格式错误: {0}")]
    MalformedJson(String),

    #[error("模型输出结构不符: {0}")]
    SchemaMismatch(String),

    #[error("规划器超时: {0}秒")]
    Timeout(u64),
}

// ===== 模型输出结构（严格解析） =====

#[derive(Debug, Deserialize)]
struct PlannedResponse {
    #[serde(default)]
    options: Vec<PlannedOption>,
}

#[derive(Debug, Deserialize)]
struct PlannedOption {
    name: String,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    semester: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    slots: Vec<TimetableSlot>,
}

// ==========================================
// GenerativePlanner - 生成式规划器
// ==========================================
pub struct GenerativePlanner {
    client: Option<Arc<dyn LlmClient>>,
    extractor: Arc<dyn JsonExtractor>,
    model: String,
    temperature: f32,
}

impl GenerativePlanner {
    /// 使用指定模型客户端创建规划器
    pub fn new(client: Arc<dyn LlmClient>, model: &str, temperature: f32) -> Self {
        Self {
            client: Some(client),
            extractor: Arc::new(BalancedBraceExtractor),
            model: model.to_string(),
            temperature,
        }
    }

    /// 未配置凭据的规划器（每次调用返回空列表）
    pub fn unconfigured(model: &str) -> Self {
        Self {
            client: None,
            extractor: Arc::new(BalancedBraceExtractor),
            model: model.to_string(),
            temperature: 0.0,
        }
    }

    /// 按配置创建；有凭据时接入 Gemini
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let planner = match GeminiClient::from_config(config)? {
            Some(client) => Self::new(Arc::new(client), &config.model, config.temperature),
            None => Self::unconfigured(&config.model),
        };
        Ok(planner)
    }

    /// 替换 JSON 提取策略
    pub fn with_extractor(mut self, extractor: Arc<dyn JsonExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 请求模型生成候选课表
    ///
    /// # 返回
    /// - Ok(空列表): 未配置凭据
    /// - Ok(候选列表): 顺序与模型输出一致
    /// - Err: 传输失败 / 无 JSON / JSON 错误 / 结构不符
    pub async fn plan(&self, req: &ScheduleRequest) -> Result<Vec<Timetable>, PlannerError> {
        let Some(client) = self.client.as_ref() else {
            debug!("规划器未配置凭据，跳过模型调用");
            return Ok(Vec::new());
        };

        let (system, user) = build_prompt(req);
        info!(
            model = %self.model,
            department = %req.department,
            courses = req.courses.len(),
            system_len = system.len(),
            user_len = user.len(),
            "规划器请求已构造"
        );

        let text = client
            .complete(LlmRequest {
                system,
                user,
                model: self.model.clone(),
                temperature: self.temperature,
            })
            .await?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                output = %truncate_for_log(&text, MAX_LLM_OUTPUT_LOG_CHARS),
                "模型原始输出"
            );
        }

        let options = self.parse_response(&text, req)?;
        info!(model = %self.model, options = options.len(), "规划器返回候选方案");
        Ok(options)
    }

    /// 解析模型文本为候选课表
    pub fn parse_response(
        &self,
        text: &str,
        req: &ScheduleRequest,
    ) -> Result<Vec<Timetable>, PlannerError> {
        let json_text = self
            .extractor
            .extract(text)
            .ok_or(PlannerError::NoJsonObject)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                json = %truncate_for_log(json_text, MAX_LLM_OUTPUT_LOG_CHARS),
                "提取的 JSON"
            );
        }

        let value: serde_json::Value = serde_json::from_str(json_text)
            .map_err(|e| PlannerError::MalformedJson(e.to_string()))?;
        let response: PlannedResponse = serde_json::from_value(value)
            .map_err(|e| PlannerError::SchemaMismatch(e.to_string()))?;

        let options = response
            .options
            .into_iter()
            .map(|opt| {
                Timetable::generated(
                    opt.name,
                    opt.department.unwrap_or_else(|| req.department.clone()),
                    opt.semester.or_else(|| req.semester.clone()),
                    opt.year.or(req.year),
                    opt.slots,
                    &self.model,
                )
            })
            .collect();
        Ok(options)
    }
}
