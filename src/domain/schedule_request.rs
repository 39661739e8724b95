// ==========================================
// 高校排课系统 - 排课请求
// ==========================================
// 生命周期: 每次调用临时构造，不持久化
// ==========================================

use crate::domain::course::Course;
use crate::domain::timetable::Timetable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

// ==========================================
// ScheduleRequest - 排课请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub department: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub constraints: Map<String, Value>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub rooms: Vec<Map<String, Value>>,
    #[serde(default)]
    pub faculty: Vec<Map<String, Value>>,
    #[serde(default)]
    pub batches: Vec<Map<String, Value>>,

    /// 是否尝试外部生成式规划器
    #[serde(default = "default_true", rename = "use_gemini", alias = "usePlanner")]
    pub use_planner: bool,
}

impl ScheduleRequest {
    pub fn new(department: &str) -> Self {
        Self {
            department: department.to_string(),
            year: None,
            semester: None,
            constraints: Map::new(),
            courses: Vec::new(),
            rooms: Vec::new(),
            faculty: Vec::new(),
            batches: Vec::new(),
            use_planner: true,
        }
    }

    /// 学期标签，缺省或空串时为 "S"
    pub fn semester_label(&self) -> &str {
        self.semester
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("S")
    }
}

/// 排课结果（候选课表列表）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub options: Vec<Timetable>,
}
