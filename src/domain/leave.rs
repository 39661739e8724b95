// ==========================================
// 高校排课系统 - 教师请假
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 请假申请（客户端提交）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub faculty_id: String,
    pub dates: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeaveRequest {
    /// 广播给在线用户的通知文本
    pub fn announcement(&self, uid: &str) -> String {
        format!("Faculty {} requested leave on {}", uid, self.dates.join(", "))
    }
}

/// 已持久化的请假记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: String,
    pub uid: String, // 提交人
    pub faculty_id: String,
    pub dates: Vec<String>,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}
