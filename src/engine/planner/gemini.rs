// ==========================================
// 高校排课系统 - Gemini 模型客户端
// ==========================================
// 协议: generativelanguage v1beta generateContent
// 要求: responseMimeType = application/json（结构化输出模式）
// ==========================================

use crate::config::planner_config::PlannerConfig;
use crate::engine::planner::llm_client::{LlmClient, LlmError, LlmRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini 客户端
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - api_key: 模型凭据
    /// - endpoint: API 根地址
    /// - timeout: HTTP 请求超时
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// 按规划器配置创建客户端；未配置凭据时返回 None
    pub fn from_config(config: &PlannerConfig) -> Result<Option<Self>, LlmError> {
        match config.api_key.as_deref() {
            Some(key) => Ok(Some(Self::new(key, &config.endpoint, config.timeout)?)),
            None => Ok(None),
        }
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

// ===== 请求/响应结构 =====

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn build_request_body(request: LlmRequest) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: request.user }],
        }],
        system_instruction: if request.system.is_empty() {
            None
        } else {
            Some(GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: request.system,
                }],
            })
        },
        generation_config: GeminiGenerationConfig {
            temperature: request.temperature,
            response_mime_type: "application/json".to_string(),
        },
    }
}

/// 从响应体取出首个候选的文本
fn extract_text(raw: &str) -> Result<String, LlmError> {
    let parsed: GeminiResponse =
        serde_json::from_str(raw).map_err(|e| LlmError::Serialization(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(LlmError::Response(format!("Gemini API 错误: {}", error.message)));
    }

    // 多个 part 按顺序拼接
    let text: String = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::Response("响应中没有内容".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: LlmRequest) -> Result<String, LlmError> {
        let url = self.build_url(&request.model);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| LlmError::Http(format!("凭据格式非法: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);

        let body = build_request_body(request);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Response(format!("HTTP {}: {}", status, text)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        extract_text(&text)
    }
}
