// ==========================================
// 高校排课系统 - 请假记录仓储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::leave::{LeaveRecord, LeaveRequest};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 请假记录仓储
pub struct LeaveRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LeaveRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存请假申请
    ///
    /// # 参数
    /// - uid: 提交人
    /// - request: 请假内容
    pub fn insert(&self, uid: &str, request: &LeaveRequest) -> RepositoryResult<LeaveRecord> {
        let record = LeaveRecord {
            id: uuid::Uuid::new_v4().to_string(),
            uid: uid.to_string(),
            faculty_id: request.faculty_id.clone(),
            dates: request.dates.clone(),
            reason: request.reason.clone(),
            created_at: Utc::now().naive_utc(),
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO leave_request (id, uid, faculty_id, dates_json, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id,
                record.uid,
                record.faculty_id,
                serde_json::to_string(&record.dates)?,
                record.reason,
                record.created_at,
            ],
        )?;
        Ok(record)
    }

    /// 查询某教师的请假记录（按提交时间升序）
    pub fn list_by_faculty(&self, faculty_id: &str) -> RepositoryResult<Vec<LeaveRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, uid, faculty_id, dates_json, reason, created_at
            FROM leave_request
            WHERE faculty_id = ?1
            ORDER BY created_at, id
            "#,
        )?;
        let rows = stmt
            .query_map(params![faculty_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, NaiveDateTime>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, uid, faculty_id, dates_json, reason, created_at)| -> RepositoryResult<LeaveRecord> {
                Ok(LeaveRecord {
                    id,
                    uid,
                    faculty_id,
                    dates: serde_json::from_str(&dates_json)?,
                    reason,
                    created_at,
                })
            })
            .collect()
    }
}
