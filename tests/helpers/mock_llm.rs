// ==========================================
// 脚本化模型客户端 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use edu_scheduler::engine::planner::{LlmClient, LlmError, LlmRequest};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 按顺序返回预设响应；脚本耗尽后返回 Response 错误
pub struct ScriptedLlmClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedLlmClient {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// 单条成功响应
    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// 单条失败响应
    pub fn failing(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// 每次调用前等待（用于超时测试）
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: LlmRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Response("脚本已耗尽".to_string())))
    }
}

/// 一个包含单个候选方案的模型输出（外带说明文字）
pub fn single_option_reply(name: &str) -> String {
    format!(
        r#"Here is the plan:
{{"options":[{{"name":"{}","slots":[
  {{"day":"Tue","startTime":"11:00","endTime":"11:50","courseCode":"CS101","courseName":"Intro","facultyId":"F1","roomId":"R9","batch":"B1"}}
]}}]}}
Let me know if you need changes."#,
        name
    )
}
