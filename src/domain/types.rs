// ==========================================
// 高校排课系统 - 领域类型定义
// ==========================================
// 职责: 角色、工作日等基础枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 用户角色 (Role)
// ==========================================
// 序列化格式: 小写 (与用户文档一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,   // 教务管理员
    Faculty, // 教师
    Student, // 学生
}

impl Role {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
            Role::Student => "student",
        }
    }

    /// 从字符串解析角色（仅接受 admin / faculty / student）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "admin" => Some(Role::Admin),
            "faculty" => Some(Role::Faculty),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 工作日 (Work Day)
// ==========================================
// 固定五天工作周: Mon..Fri
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl WorkDay {
    /// 一周的工作日顺序
    pub const WEEK: [WorkDay; 5] = [
        WorkDay::Mon,
        WorkDay::Tue,
        WorkDay::Wed,
        WorkDay::Thu,
        WorkDay::Fri,
    ];

    /// 按序号循环取工作日（超过周五回到周一）
    pub fn cycle(index: usize) -> Self {
        Self::WEEK[index % Self::WEEK.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkDay::Mon => "Mon",
            WorkDay::Tue => "Tue",
            WorkDay::Wed => "Wed",
            WorkDay::Thu => "Thu",
            WorkDay::Fri => "Fri",
        }
    }
}

impl fmt::Display for WorkDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
