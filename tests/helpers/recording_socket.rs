// ==========================================
// 记录型连接发送端 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use edu_scheduler::notify::{NotificationSocket, NotifyError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingSocket {
    messages: Mutex<Vec<String>>,
    broken: AtomicBool,
}

impl RecordingSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的发送全部失败
    pub fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSocket for RecordingSocket {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(NotifyError::Closed);
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
