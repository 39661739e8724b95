// ==========================================
// 高校排课系统 - 外部生成式规划器
// ==========================================
// 职责: 调用文本生成模型产出候选课表
// 可选: 未配置凭据/失败时由编排器回退到启发式生成器
// ==========================================

pub mod gemini;
pub mod generative;
pub mod json_extract;
pub mod llm_client;
pub mod prompt;

pub use gemini::GeminiClient;
pub use generative::{GenerativePlanner, PlannerError};
pub use json_extract::{BalancedBraceExtractor, GreedyBraceExtractor, JsonExtractor};
pub use llm_client::{LlmClient, LlmError, LlmRequest};
