// ==========================================
// 高校排课系统 - 课表文档仓储
// ==========================================
// 存储: timetable 主表 (slots/metadata 以 JSON 存放)
//       timetable_faculty_index / timetable_batch_index 成员索引表
// 红线: 写入时一律按 slots 重算索引，不使用调用方传入的索引
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::timetable::{Timetable, TimetableSlot};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

const SELECT_COLUMNS: &str =
    "t.id, t.name, t.department, t.semester, t.year, t.slots_json, t.metadata_json";

/// 原始行（JSON 字段尚未解析）
struct TimetableRow {
    id: String,
    name: String,
    department: String,
    semester: Option<String>,
    year: Option<i32>,
    slots_json: String,
    metadata_json: String,
}

impl TimetableRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            department: row.get(2)?,
            semester: row.get(3)?,
            year: row.get(4)?,
            slots_json: row.get(5)?,
            metadata_json: row.get(6)?,
        })
    }

    fn into_domain(self) -> RepositoryResult<Timetable> {
        let slots: Vec<TimetableSlot> = serde_json::from_str(&self.slots_json)?;
        let metadata: BTreeMap<String, Value> = serde_json::from_str(&self.metadata_json)?;
        let mut timetable = Timetable {
            id: Some(self.id),
            name: self.name,
            department: self.department,
            semester: self.semester,
            year: self.year,
            slots,
            faculty_index: Vec::new(),
            batch_index: Vec::new(),
            metadata,
        };
        timetable.refresh_indexes();
        Ok(timetable)
    }
}

// ==========================================
// TimetableRepository - 课表仓储
// ==========================================
/// 课表仓储
/// 职责: 管理 timetable 及索引表的 CRUD 操作
/// 红线: 不含业务逻辑，只负责数据访问
pub struct TimetableRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimetableRepository {
    /// 创建新的 TimetableRepository 实例
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

    /// 新建课表
    ///
    /// # 返回
    /// 分配了存储 id 与时段 id、索引已重算的课表
    pub fn insert(&self, timetable: &Timetable) -> RepositoryResult<Timetable> {
        let mut stored = timetable.clone();
        stored.id = Some(uuid::Uuid::new_v4().to_string());
        stored.assign_slot_ids();
        stored.refresh_indexes();

        let now = Utc::now().naive_utc();
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        write_document(&tx, &stored, now, true)?;
        tx.commit()?;

        debug!(timetable_id = ?stored.id, slots = stored.slots.len(), "课表已创建");
        Ok(stored)
    }

    /// 按 id 整体替换课表
    ///
    /// # 返回
    /// - Err(NotFound): 课表不存在
    pub fn replace(&self, id: &str, timetable: &Timetable) -> RepositoryResult<Timetable> {
        let mut stored = timetable.clone();
        stored.id = Some(id.to_string());
        stored.assign_slot_ids();
        stored.refresh_indexes();

        let now = Utc::now().naive_utc();
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let exists = tx
            .query_row("SELECT 1 FROM timetable WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(RepositoryError::NotFound {
                entity: "Timetable".to_string(),
                id: id.to_string(),
            });
        }
        write_document(&tx, &stored, now, false)?;
        tx.commit()?;

        debug!(timetable_id = id, slots = stored.slots.len(), "课表已更新");
        Ok(stored)
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Timetable>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM timetable t WHERE t.id = ?1", SELECT_COLUMNS),
                params![id],
                TimetableRow::from_row,
            )
            .optional()?;
        row.map(TimetableRow::into_domain).transpose()
    }

    /// 列出课表（可按院系过滤）
    pub fn list(&self, department: Option<&str>) -> RepositoryResult<Vec<Timetable>> {
        let conn = self.get_conn()?;
        let rows = match department {
            Some(dept) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM timetable t WHERE t.department = ?1 ORDER BY t.created_at, t.id",
                    SELECT_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![dept], TimetableRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM timetable t ORDER BY t.created_at, t.id",
                    SELECT_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], TimetableRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        rows.into_iter().map(TimetableRow::into_domain).collect()
    }

    /// facultyIndex 包含指定教师的课表
    pub fn list_by_faculty(&self, faculty_id: &str) -> RepositoryResult<Vec<Timetable>> {
        self.list_by_member(
            "SELECT {} FROM timetable t
             JOIN timetable_faculty_index f ON f.timetable_id = t.id
             WHERE f.faculty_id = ?1 ORDER BY t.created_at, t.id",
            faculty_id,
        )
    }

    /// batchIndex 包含指定班级的课表
    pub fn list_by_batch(&self, batch: &str) -> RepositoryResult<Vec<Timetable>> {
        self.list_by_member(
            "SELECT {} FROM timetable t
             JOIN timetable_batch_index b ON b.timetable_id = t.id
             WHERE b.batch = ?1 ORDER BY t.created_at, t.id",
            batch,
        )
    }

    fn list_by_member(&self, sql_template: &str, member: &str) -> RepositoryResult<Vec<Timetable>> {
        let conn = self.get_conn()?;
        let sql = sql_template.replacen("{}", SELECT_COLUMNS, 1);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![member], TimetableRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(TimetableRow::into_domain).collect()
    }

    /// 删除课表，返回是否存在
    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM timetable WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

/// 写入主表与索引表（调用方负责事务）
fn write_document(
    tx: &Transaction<'_>,
    timetable: &Timetable,
    now: NaiveDateTime,
    is_new: bool,
) -> RepositoryResult<()> {
    let id = timetable
        .id
        .as_deref()
        .ok_or_else(|| RepositoryError::InternalError("课表缺少存储 id".to_string()))?;
    let slots_json = serde_json::to_string(&timetable.slots)?;
    let metadata_json = serde_json::to_string(&timetable.metadata)?;

    if is_new {
        tx.execute(
            r#"
            INSERT INTO timetable (
                id, name, department, semester, year,
                slots_json, metadata_json, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
            params![
                id,
                timetable.name,
                timetable.department,
                timetable.semester,
                timetable.year,
                slots_json,
                metadata_json,
                now,
            ],
        )?;
    } else {
        tx.execute(
            r#"
            UPDATE timetable SET
                name = ?2, department = ?3, semester = ?4, year = ?5,
                slots_json = ?6, metadata_json = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
            params![
                id,
                timetable.name,
                timetable.department,
                timetable.semester,
                timetable.year,
                slots_json,
                metadata_json,
                now,
            ],
        )?;
        tx.execute("DELETE FROM timetable_faculty_index WHERE timetable_id = ?1", params![id])?;
        tx.execute("DELETE FROM timetable_batch_index WHERE timetable_id = ?1", params![id])?;
    }

    for faculty_id in &timetable.faculty_index {
        tx.execute(
            "INSERT INTO timetable_faculty_index (timetable_id, faculty_id) VALUES (?1, ?2)",
            params![id, faculty_id],
        )?;
    }
    for batch in &timetable.batch_index {
        tx.execute(
            "INSERT INTO timetable_batch_index (timetable_id, batch) VALUES (?1, ?2)",
            params![id, batch],
        )?;
    }
    Ok(())
}
