// ==========================================
// 高校排课系统 - 用户档案仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::Role;
use crate::domain::user::UserProfile;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "uid, email, role, display_name, photo_url, avatar, \
     department, faculty_id, student_id, batch, year";

/// 用户档案仓储
/// 职责: 管理 user_profile 表
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 创建新的 UserRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按 uid 查询
    pub fn find_by_uid(&self, uid: &str) -> RepositoryResult<Option<UserProfile>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM user_profile WHERE uid = ?1", SELECT_COLUMNS),
                params![uid],
                map_row,
            )
            .optional()?;
        row.transpose()
    }

    /// 仅当档案不存在时写入，返回最终档案
    ///
    /// 并发首次登录时以先写入者为准
    pub fn insert_if_absent(&self, profile: &UserProfile) -> RepositoryResult<UserProfile> {
        {
            let conn = self.get_conn()?;
            let now = Utc::now().naive_utc();
            conn.execute(
                r#"
                INSERT OR IGNORE INTO user_profile (
                    uid, email, role, display_name, photo_url, avatar,
                    department, faculty_id, student_id, batch, year,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
                "#,
                params![
                    profile.uid,
                    profile.email,
                    profile.role.as_str(),
                    profile.display_name,
                    profile.photo_url,
                    profile.avatar,
                    profile.department,
                    profile.faculty_id,
                    profile.student_id,
                    profile.batch,
                    profile.year,
                    now,
                ],
            )?;
        }
        self.find_by_uid(&profile.uid)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "UserProfile".to_string(),
                id: profile.uid.clone(),
            })
    }

    /// 写入或覆盖档案
    pub fn upsert(&self, profile: &UserProfile) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let now = Utc::now().naive_utc();
        conn.execute(
            r#"
            INSERT INTO user_profile (
                uid, email, role, display_name, photo_url, avatar,
                department, faculty_id, student_id, batch, year,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            ON CONFLICT(uid) DO UPDATE SET
                email = ?2, role = ?3, display_name = ?4, photo_url = ?5, avatar = ?6,
                department = ?7, faculty_id = ?8, student_id = ?9, batch = ?10, year = ?11,
                updated_at = ?12
            "#,
            params![
                profile.uid,
                profile.email,
                profile.role.as_str(),
                profile.display_name,
                profile.photo_url,
                profile.avatar,
                profile.department,
                profile.faculty_id,
                profile.student_id,
                profile.batch,
                profile.year,
                now,
            ],
        )?;
        Ok(())
    }

    /// 修改角色
    ///
    /// # 返回
    /// - Err(NotFound): 档案不存在
    pub fn set_role(&self, uid: &str, role: Role) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE user_profile SET role = ?2, updated_at = ?3 WHERE uid = ?1",
            params![uid, role.as_str(), Utc::now().naive_utc()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "UserProfile".to_string(),
                id: uid.to_string(),
            });
        }
        Ok(())
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RepositoryResult<UserProfile>> {
    let role_raw: String = row.get(2)?;
    let Some(role) = Role::parse(&role_raw) else {
        return Ok(Err(RepositoryError::FieldValueError {
            field: "role".to_string(),
            message: format!("未知角色: {}", role_raw),
        }));
    };
    Ok(Ok(UserProfile {
        uid: row.get(0)?,
        email: row.get(1)?,
        role,
        display_name: row.get(3)?,
        photo_url: row.get(4)?,
        avatar: row.get(5)?,
        department: row.get(6)?,
        faculty_id: row.get(7)?,
        student_id: row.get(8)?,
        batch: row.get(9)?,
        year: row.get(10)?,
    }))
}
