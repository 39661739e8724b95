// ==========================================
// 高校排课系统 - 冲突检测
// ==========================================
// 规则: 同一天、[start, end) 时间段重叠，且
//       同一教师 / 同一教室（AUTO 除外）/ 同一非空班级
// 容错: 时间无法解析的时段直接跳过，不报错
// ==========================================

use crate::domain::conflict::ConflictReport;
use crate::domain::timetable::{Timetable, TimetableSlot};
use crate::engine::heuristic::AUTO_ROOM;
use chrono::NaiveTime;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// 冲突类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    FacultyOverlap,
    RoomOverlap,
    BatchOverlap,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::FacultyOverlap => "faculty_overlap",
            ConflictKind::RoomOverlap => "room_overlap",
            ConflictKind::BatchOverlap => "batch_overlap",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一次检测命中（first 在课表中位于 second 之前）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedConflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub day: String,
    pub first_index: usize,
    pub second_index: usize,
    pub first_slot_id: Option<String>,
    pub second_slot_id: Option<String>,
    /// 共享的资源（教师 / 教室 / 班级标识）
    pub shared: String,
    pub start_time: String,
    pub end_time: String,
}

impl DetectedConflict {
    /// 转为可交给冲突调整的上报格式（以后一个时段为准）
    pub fn to_report(&self) -> ConflictReport {
        ConflictReport {
            kind: self.kind.to_string(),
            slot_id: self.second_slot_id.clone(),
            start_time: Some(self.start_time.clone()),
            end_time: Some(self.end_time.clone()),
        }
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

struct TimedSlot<'a> {
    index: usize,
    slot: &'a TimetableSlot,
    start: NaiveTime,
    end: NaiveTime,
}

// ==========================================
// ConflictDetector - 冲突检测器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// 检测课表中的所有两两冲突
    pub fn detect(&self, timetable: &Timetable) -> Vec<DetectedConflict> {
        let timed: Vec<TimedSlot> = timetable
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let start = parse_time(&slot.start_time)?;
                let end = parse_time(&slot.end_time)?;
                (start < end).then_some(TimedSlot { index, slot, start, end })
            })
            .collect();

        let skipped = timetable.slots.len() - timed.len();
        if skipped > 0 {
            debug!(skipped, "跳过时间无法解析的时段");
        }

        let mut found = Vec::new();
        for (pos, a) in timed.iter().enumerate() {
            for b in &timed[pos + 1..] {
                if a.slot.day.trim() != b.slot.day.trim() || !(a.start < b.end && b.start < a.end) {
                    continue;
                }
                for (kind, shared) in shared_resources(a.slot, b.slot) {
                    found.push(DetectedConflict {
                        kind,
                        day: b.slot.day.clone(),
                        first_index: a.index,
                        second_index: b.index,
                        first_slot_id: a.slot.id.clone(),
                        second_slot_id: b.slot.id.clone(),
                        shared,
                        start_time: b.slot.start_time.clone(),
                        end_time: b.slot.end_time.clone(),
                    });
                }
            }
        }
        found
    }

    /// 检测并转为冲突上报列表
    pub fn detect_reports(&self, timetable: &Timetable) -> Vec<ConflictReport> {
        self.detect(timetable).iter().map(DetectedConflict::to_report).collect()
    }
}

fn shared_resources(a: &TimetableSlot, b: &TimetableSlot) -> Vec<(ConflictKind, String)> {
    let mut shared = Vec::new();
    if a.faculty_id == b.faculty_id {
        shared.push((ConflictKind::FacultyOverlap, a.faculty_id.clone()));
    }
    if a.room_id == b.room_id && a.room_id != AUTO_ROOM {
        shared.push((ConflictKind::RoomOverlap, a.room_id.clone()));
    }
    if let (Some(x), Some(y)) = (a.batch_value(), b.batch_value()) {
        if x == y {
            shared.push((ConflictKind::BatchOverlap, x.to_string()));
        }
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timetable::HEURISTIC_GENERATOR;

    fn slot(id: &str, day: &str, start: &str, end: &str, faculty: &str, room: &str, batch: Option<&str>) -> TimetableSlot {
        TimetableSlot {
            id: Some(id.to_string()),
            day: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            course_code: format!("C-{}", id),
            course_name: "Course".to_string(),
            faculty_id: faculty.to_string(),
            room_id: room.to_string(),
            batch: batch.map(str::to_string),
            resources: None,
        }
    }

    fn timetable(slots: Vec<TimetableSlot>) -> Timetable {
        Timetable::generated("T".into(), "CSE".into(), None, None, slots, HEURISTIC_GENERATOR)
    }

    #[test]
    fn test_faculty_overlap() {
        let tt = timetable(vec![
            slot("a", "Mon", "09:00", "09:50", "F1", "R1", None),
            slot("b", "Mon", "09:30", "10:20", "F1", "R2", None),
        ]);
        let found = ConflictDetector::new().detect(&tt);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ConflictKind::FacultyOverlap);
        assert_eq!(found[0].second_slot_id.as_deref(), Some("b"));

        let report = found[0].to_report();
        assert_eq!(report.kind, "faculty_overlap");
        assert_eq!(report.slot_id.as_deref(), Some("b"));
        assert_eq!(report.start_time.as_deref(), Some("09:30"));
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let tt = timetable(vec![
            slot("a", "Mon", "09:00", "10:00", "F1", "R1", Some("A")),
            slot("b", "Mon", "10:00", "10:50", "F1", "R1", Some("A")),
        ]);
        assert!(ConflictDetector::new().detect(&tt).is_empty());
    }

    #[test]
    fn test_different_days_never_clash() {
        let tt = timetable(vec![
            slot("a", "Mon", "09:00", "09:50", "F1", "R1", None),
            slot("b", "Tue", "09:00", "09:50", "F1", "R1", None),
        ]);
        assert!(ConflictDetector::new().detect(&tt).is_empty());
    }

    #[test]
    fn test_auto_room_and_empty_batch_never_clash() {
        let tt = timetable(vec![
            slot("a", "Wed", "11:00", "11:50", "F1", "AUTO", Some("")),
            slot("b", "Wed", "11:00", "11:50", "F2", "AUTO", Some("")),
        ]);
        assert!(ConflictDetector::new().detect(&tt).is_empty());
    }

    #[test]
    fn test_multiple_kinds_for_one_pair() {
        let tt = timetable(vec![
            slot("a", "Thu", "13:00", "13:50", "F1", "R9", Some("B1")),
            slot("b", "Thu", "13:00", "13:50", "F2", "R9", Some("B1")),
        ]);
        let kinds: Vec<_> = ConflictDetector::new().detect(&tt).iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConflictKind::RoomOverlap, ConflictKind::BatchOverlap]);
    }

    #[test]
    fn test_unparseable_times_are_skipped() {
        let tt = timetable(vec![
            slot("a", "Fri", "9am", "10am", "F1", "R1", None),
            slot("b", "Fri", "09:00", "09:50", "F1", "R1", None),
        ]);
        assert!(ConflictDetector::new().detect(&tt).is_empty());
    }

    #[test]
    fn test_heuristic_output_has_no_faculty_clash() {
        use crate::domain::course::Course;
        use crate::domain::schedule_request::ScheduleRequest;
        use crate::engine::heuristic::HeuristicGenerator;

        let mut req = ScheduleRequest::new("CSE");
        req.courses.push(Course::new("CS1", "A", "F1").with_per_week(6));
        req.courses.push(Course::new("CS2", "B", "F1").with_per_week(6));
        for tt in HeuristicGenerator::new().generate(&req) {
            assert!(ConflictDetector::new().detect_reports(&tt).is_empty());
        }
    }
}
