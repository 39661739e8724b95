// ==========================================
// 高校排课系统 - 文本生成模型客户端接口
// ==========================================
// 职责: 屏蔽具体模型供应商，便于替换与测试
// ==========================================

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 单次模型调用请求
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub temperature: f32,
}

/// 模型传输层错误
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP 请求失败: {0}")]
    Http(String),

    #[error("模型响应异常: {0}")]
    Response(String),

    #[error("序列化失败: {0}")]
    Serialization(String),
}

// ==========================================
// LlmClient Trait
// ==========================================
// 实现者: GeminiClient（生产）、脚本化客户端（测试）
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 提交一次请求，返回模型原始文本
    async fn complete(&self, request: LlmRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl LlmClient for Arc<dyn LlmClient> {
    async fn complete(&self, request: LlmRequest) -> Result<String, LlmError> {
        (**self).complete(request).await
    }
}

/// 截断日志输出，避免大段模型文本刷屏
pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
