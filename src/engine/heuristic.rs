// ==========================================
// 高校排课系统 - 启发式排课生成器
// ==========================================
// 职责: 确定性轮转排课，作为外部规划器不可用时的兜底
// 红线: 无外部调用、无失败路径、不做冲突检测
// ==========================================

use crate::domain::schedule_request::ScheduleRequest;
use crate::domain::timetable::{Timetable, TimetableSlot, HEURISTIC_GENERATOR};
use crate::domain::types::WorkDay;
use tracing::debug;

/// 未指定首选教室时的教室占位符
pub const AUTO_ROOM: &str = "AUTO";

/// 每日首节起始小时
pub const DAY_START_HOUR: u32 = 9;

/// 达到该小时即换到下一天
pub const DAY_END_HOUR: u32 = 17;

/// 相邻两节的间隔（小时）
pub const HOUR_STRIDE: u32 = 2;

/// 候选方案数量（起始小时偏移 0 / 1）
pub const VARIANT_COUNT: u32 = 2;

// ==========================================
// SlotCursor - 时段游标
// ==========================================
// 同一方案内跨课程延续，不随课程重置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotCursor {
    base_hour: u32,
    hour: u32,
    day_index: usize,
}

impl SlotCursor {
    fn new(variant: u32) -> Self {
        let base_hour = DAY_START_HOUR + variant;
        Self {
            base_hour,
            hour: base_hour,
            day_index: 0,
        }
    }

    fn day(&self) -> WorkDay {
        WorkDay::cycle(self.day_index)
    }

    /// 前进一节；到达日终则回到起始小时并换天
    fn advance(&mut self) {
        self.hour += HOUR_STRIDE;
        if self.hour >= DAY_END_HOUR {
            self.hour = self.base_hour;
            self.day_index += 1;
        }
    }
}

// ==========================================
// HeuristicGenerator - 启发式生成器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicGenerator;

impl HeuristicGenerator {
    pub fn new() -> Self {
        Self
    }

    /// 生成两个候选课表 (opt1 / opt2)
    ///
    /// # 参数
    /// - req: 排课请求
    ///
    /// # 返回
    /// 恰好两个候选方案，课程为空时返回空时段课表
    pub fn generate(&self, req: &ScheduleRequest) -> Vec<Timetable> {
        (0..VARIANT_COUNT)
            .map(|variant| self.generate_variant(req, variant))
            .collect()
    }

    fn generate_variant(&self, req: &ScheduleRequest, variant: u32) -> Timetable {
        let mut cursor = SlotCursor::new(variant);
        let mut slots = Vec::new();

        for course in &req.courses {
            for _ in 0..course.per_week {
                slots.push(TimetableSlot {
                    id: None,
                    day: cursor.day().to_string(),
                    start_time: format!("{:02}:00", cursor.hour),
                    end_time: format!("{:02}:50", cursor.hour),
                    course_code: course.code.clone(),
                    course_name: course.name.clone(),
                    faculty_id: course.faculty_id.clone(),
                    room_id: course
                        .preferred_room_id
                        .clone()
                        .unwrap_or_else(|| AUTO_ROOM.to_string()),
                    batch: course.batch.clone(),
                    resources: Some(course.resources.clone().unwrap_or_default()),
                });
                cursor.advance();
            }
        }

        debug!(
            department = %req.department,
            variant = variant + 1,
            slots = slots.len(),
            "启发式方案生成完成"
        );

        Timetable::generated(
            format!(
                "Auto-{}-{}-opt{}",
                req.department,
                req.semester_label(),
                variant + 1
            ),
            req.department.clone(),
            req.semester.clone(),
            req.year,
            slots,
            HEURISTIC_GENERATOR,
        )
    }
}
