// ==========================================
// 高校排课系统 - 课程领域模型
// ==========================================
// 用途: 排课生成的不可变输入
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 未指定周课时数时的默认值
pub const DEFAULT_SESSIONS_PER_WEEK: u32 = 2;

fn default_per_week() -> u32 {
    DEFAULT_SESSIONS_PER_WEEK
}

/// 负数按 0 节处理，null 取默认值，小数向下取整
fn per_week_clamped<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<f64>::deserialize(deserializer)? {
        None => DEFAULT_SESSIONS_PER_WEEK,
        Some(n) if n <= 0.0 => 0,
        Some(n) => n.min(u32::MAX as f64) as u32,
    })
}

// ==========================================
// Course - 课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,       // 课程代码
    pub name: String,       // 课程名称
    pub faculty_id: String, // 任课教师标识

    #[serde(default = "default_per_week", deserialize_with = "per_week_clamped")]
    pub per_week: u32, // 每周节数

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_room_id: Option<String>, // 首选教室

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>, // 授课班级

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>, // 资源标签 (如 projector / lab)

    // 其余字段原样保留，交给外部规划器参考
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(code: &str, name: &str, faculty_id: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            faculty_id: faculty_id.to_string(),
            per_week: DEFAULT_SESSIONS_PER_WEEK,
            preferred_room_id: None,
            batch: None,
            resources: None,
            extra: Map::new(),
        }
    }

    pub fn with_per_week(mut self, per_week: u32) -> Self {
        self.per_week = per_week;
        self
    }

    pub fn with_room(mut self, room_id: &str) -> Self {
        self.preferred_room_id = Some(room_id.to_string());
        self
    }

    pub fn with_batch(mut self, batch: &str) -> Self {
        self.batch = Some(batch.to_string());
        self
    }

    pub fn with_resources(mut self, resources: &[&str]) -> Self {
        self.resources = Some(resources.iter().map(|r| r.to_string()).collect());
        self
    }
}
