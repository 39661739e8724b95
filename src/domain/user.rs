// ==========================================
// 高校排课系统 - 用户档案
// ==========================================
// 来源: 身份校验后的声明 (claims) + 用户自行维护的档案字段
// ==========================================

use crate::domain::types::Role;
use serde::{Deserialize, Serialize};

// ==========================================
// UserProfile - 用户档案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub faculty_id: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl UserProfile {
    /// 首次登录时的默认档案（角色为 student）
    pub fn first_sign_in(
        uid: &str,
        email: &str,
        display_name: Option<String>,
        photo_url: Option<String>,
    ) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            role: Role::Student,
            display_name,
            photo_url,
            avatar: None,
            department: None,
            faculty_id: None,
            student_id: None,
            batch: None,
            year: None,
        }
    }

    /// 教师视图使用的教师标识（未设置 facultyId 时退回 uid）
    pub fn faculty_key(&self) -> &str {
        self.faculty_id
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(&self.uid)
    }

    /// 学生视图使用的班级
    pub fn batch_key(&self) -> Option<&str> {
        self.batch.as_deref().filter(|b| !b.is_empty())
    }
}
