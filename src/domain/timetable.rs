// ==========================================
// 高校排课系统 - 课表领域模型
// ==========================================
// 红线: facultyIndex / batchIndex 只能由 slots 推导
//       每次创建/更新都重新计算，不信任客户端或模型输出
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// 元数据中标识来源生成器的键
pub const GENERATOR_KEY: &str = "generator";

/// 启发式生成器的来源标识
pub const HEURISTIC_GENERATOR: &str = "heuristic";

// ==========================================
// TimetableSlot - 课表时段
// ==========================================
// 时间格式: "HH:MM"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub course_code: String,
    pub course_name: String,
    pub faculty_id: String,
    pub room_id: String,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
}

impl TimetableSlot {
    /// 班级是否有效（None 与空串都视为无班级）
    pub fn batch_value(&self) -> Option<&str> {
        self.batch.as_deref().filter(|b| !b.is_empty())
    }
}

// ==========================================
// Timetable - 课表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    #[serde(default)]
    pub id: Option<String>, // 存储分配，持久化前为空
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub slots: Vec<TimetableSlot>,
    #[serde(default)]
    pub faculty_index: Vec<String>,
    #[serde(default)]
    pub batch_index: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl Timetable {
    /// 由生成器构造课表，索引与来源标识同步填充
    pub fn generated(
        name: String,
        department: String,
        semester: Option<String>,
        year: Option<i32>,
        slots: Vec<TimetableSlot>,
        generator: &str,
    ) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(GENERATOR_KEY.to_string(), Value::String(generator.to_string()));

        let mut timetable = Self {
            id: None,
            name,
            department,
            semester,
            year,
            slots,
            faculty_index: Vec::new(),
            batch_index: Vec::new(),
            metadata,
        };
        timetable.refresh_indexes();
        timetable
    }

    /// 按当前 slots 重新计算索引
    pub fn refresh_indexes(&mut self) {
        self.faculty_index = faculty_index(&self.slots);
        self.batch_index = batch_index(&self.slots);
    }

    /// 来源生成器标识
    pub fn generator(&self) -> Option<&str> {
        self.metadata.get(GENERATOR_KEY).and_then(Value::as_str)
    }

    /// 为缺少 id 的时段分配 id，已有 id 保持不变
    pub fn assign_slot_ids(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.id.as_deref().map_or(true, str::is_empty) {
                slot.id = Some(uuid::Uuid::new_v4().to_string());
            }
        }
    }
}

/// 教师索引: slots 中出现的教师标识，去重升序
pub fn faculty_index(slots: &[TimetableSlot]) -> Vec<String> {
    slots
        .iter()
        .map(|s| s.faculty_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 班级索引: 非空班级值，去重升序
pub fn batch_index(slots: &[TimetableSlot]) -> Vec<String> {
    slots
        .iter()
        .filter_map(|s| s.batch_value().map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(faculty: &str, batch: Option<&str>) -> TimetableSlot {
        TimetableSlot {
            id: None,
            day: "Mon".to_string(),
            start_time: "09:00".to_string(),
            end_time: "09:50".to_string(),
            course_code: "CS101".to_string(),
            course_name: "Intro".to_string(),
            faculty_id: faculty.to_string(),
            room_id: "R1".to_string(),
            batch: batch.map(str::to_string),
            resources: None,
        }
    }

    #[test]
    fn test_indexes_sorted_and_deduplicated() {
        let slots = vec![
            slot("F2", Some("B")),
            slot("F1", Some("A")),
            slot("F2", Some("")),
            slot("F3", None),
            slot("F1", Some("A")),
        ];
        assert_eq!(faculty_index(&slots), vec!["F1", "F2", "F3"]);
        assert_eq!(batch_index(&slots), vec!["A", "B"]);
    }

    #[test]
    fn test_refresh_overrides_client_indexes() {
        let mut tt = Timetable::generated(
            "T".to_string(),
            "CSE".to_string(),
            None,
            None,
            vec![slot("F1", Some("A"))],
            HEURISTIC_GENERATOR,
        );
        tt.faculty_index = vec!["bogus".to_string()];
        tt.batch_index = vec![];
        tt.refresh_indexes();
        assert_eq!(tt.faculty_index, vec!["F1"]);
        assert_eq!(tt.batch_index, vec!["A"]);
        assert_eq!(tt.generator(), Some("heuristic"));
    }

    #[test]
    fn test_assign_slot_ids_keeps_existing() {
        let mut first = slot("F1", None);
        first.id = Some("keep-me".to_string());
        let mut tt = Timetable::generated(
            "T".to_string(),
            "CSE".to_string(),
            None,
            None,
            vec![first, slot("F2", None)],
            HEURISTIC_GENERATOR,
        );
        tt.assign_slot_ids();
        assert_eq!(tt.slots[0].id.as_deref(), Some("keep-me"));
        assert!(tt.slots[1].id.is_some());
    }

    #[test]
    fn test_timetable_json_is_camel_case() {
        let tt = Timetable::generated(
            "T".to_string(),
            "CSE".to_string(),
            Some("S1".to_string()),
            Some(2),
            vec![slot("F1", Some("A"))],
            HEURISTIC_GENERATOR,
        );
        let json = serde_json::to_value(&tt).unwrap();
        assert!(json.get("facultyIndex").is_some());
        assert!(json.get("batchIndex").is_some());
        assert_eq!(json["slots"][0]["startTime"], "09:00");
        assert_eq!(json["metadata"]["generator"], "heuristic");
    }
}
