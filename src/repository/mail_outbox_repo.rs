// ==========================================
// 高校排课系统 - 外发邮件待发箱
// ==========================================
// 用途: 反馈邮件先入库，由投递进程读取 PENDING 记录发送
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::feedback::OutboundMail;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_SENT: &str = "SENT";

/// 待发箱中的一封邮件
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    pub id: String,
    pub mail: OutboundMail,
    pub status: String,
    pub created_at: NaiveDateTime,
}

pub struct MailOutboxRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MailOutboxRepository {
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

    /// 入队一封邮件，返回记录 id
    pub fn enqueue(&self, mail: &OutboundMail) -> RepositoryResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO mail_outbox (id, recipient, subject, body, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                mail.to,
                mail.subject,
                mail.body,
                STATUS_PENDING,
                Utc::now().naive_utc()
            ],
        )?;
        Ok(id)
    }

    /// 待发送邮件（按入队顺序）
    pub fn list_pending(&self) -> RepositoryResult<Vec<OutboxEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, recipient, subject, body, status, created_at
            FROM mail_outbox
            WHERE status = ?1
            ORDER BY created_at, rowid
            "#,
        )?;
        let entries = stmt
            .query_map(params![STATUS_PENDING], |row| {
                Ok(OutboxEntry {
                    id: row.get(0)?,
                    mail: OutboundMail {
                        to: row.get(1)?,
                        subject: row.get(2)?,
                        body: row.get(3)?,
                    },
                    status: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// 标记为已发送
    pub fn mark_sent(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE mail_outbox SET status = ?2, sent_at = ?3 WHERE id = ?1",
            params![id, STATUS_SENT, Utc::now().naive_utc()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MailOutbox".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
