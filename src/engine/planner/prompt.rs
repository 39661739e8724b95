// ==========================================
// 高校排课系统 - 规划器提示词
// ==========================================

use crate::domain::schedule_request::ScheduleRequest;
use serde_json::{json, Value};

const SYSTEM_PROMPT: &str = "You are an expert timetable generator for a university. \
Given JSON of courses, rooms, faculty, batches and constraints, produce an optimized weekly timetable.";

const HARD_CONSTRAINTS: &[&str] = &[
    "no clashes per faculty, room or batch (nobody is double-booked)",
    "respect the maximum daily teaching hours",
    "respect room capacity and required resources",
];

const SOFT_CONSTRAINTS: &[&str] = &[
    "avoid back-to-back sessions for the same faculty or batch",
    "balance the teaching load across the week",
    "keep lab sessions contiguous",
];

const OUTPUT_SHAPE: &str = r#"{"options":[{"name":"...","department":"...","semester":"...","year":1,"slots":[{"day":"Mon","startTime":"09:00","endTime":"09:50","courseCode":"...","courseName":"...","facultyId":"...","roomId":"...","batch":"...","resources":["..."]}]}]}"#;

/// 结构化输入负载
pub fn build_payload(req: &ScheduleRequest) -> Value {
    json!({
        "department": req.department,
        "semester": req.semester,
        "year": req.year,
        "constraints": req.constraints,
        "courses": req.courses,
        "rooms": req.rooms,
        "faculty": req.faculty,
        "batches": req.batches,
    })
}

/// 构造 (system, user) 提示词
pub fn build_prompt(req: &ScheduleRequest) -> (String, String) {
    let mut system = String::from(SYSTEM_PROMPT);
    system.push_str("\n\nHard constraints (must hold):\n");
    for rule in HARD_CONSTRAINTS {
        system.push_str(&format!("- {}\n", rule));
    }
    system.push_str("\nSoft constraints (optimize):\n");
    for rule in SOFT_CONSTRAINTS {
        system.push_str(&format!("- {}\n", rule));
    }
    system.push_str("\nReturn strictly JSON with a top-level array named options, shaped like:\n");
    system.push_str(OUTPUT_SHAPE);
    system.push_str("\nDays are Mon..Fri, times are HH:MM. Return JSON only.\n");

    let mut user = format!(
        "Department: {}, Semester: {}, Year: {}.\n\n",
        req.department,
        req.semester.as_deref().unwrap_or("-"),
        req.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
    );
    user.push_str("Input:\n");
    user.push_str(&build_payload(req).to_string());
    user.push('\n');

    (system, user)
}
