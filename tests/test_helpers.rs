// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、预置用户档案、令牌与应用状态装配
// ==========================================

#![allow(dead_code)]

use edu_scheduler::app::AppState;
use edu_scheduler::auth::{IdentityClaims, StaticTokenVerifier};
use edu_scheduler::domain::types::Role;
use edu_scheduler::domain::user::UserProfile;
use edu_scheduler::engine::GenerativePlanner;
use edu_scheduler::repository::UserRepository;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const FACULTY_TOKEN: &str = "faculty-token";
pub const STUDENT_TOKEN: &str = "student-token";
/// 已登记但从未建档的用户
pub const NEWCOMER_TOKEN: &str = "newcomer-token";

pub const ADMIN_UID: &str = "admin-1";
pub const FACULTY_UID: &str = "fac-1";
pub const FACULTY_ID: &str = "F1";
pub const STUDENT_UID: &str = "stu-1";
pub const STUDENT_BATCH: &str = "B1";
pub const NEWCOMER_UID: &str = "new-1";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = Connection::open(&db_path)?;
    edu_scheduler::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（与生产一致的 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(edu_scheduler::db::open_sqlite_connection(db_path)?)
}

/// 共享连接（仓储 from_connection 使用）
pub fn shared_test_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    Ok(Arc::new(Mutex::new(open_test_connection(db_path)?)))
}

/// 满足登录规则的 Gmail 声明
pub fn gmail_claims(uid: &str) -> IdentityClaims {
    IdentityClaims {
        uid: uid.to_string(),
        email_verified: true,
        sign_in_provider: Some("google.com".to_string()),
        email: Some(format!("{}@gmail.com", uid)),
        display_name: Some(format!("User {}", uid)),
        photo_url: None,
    }
}

/// 登记测试令牌
pub fn test_verifier() -> Arc<StaticTokenVerifier> {
    let verifier = StaticTokenVerifier::new();
    verifier.register(ADMIN_TOKEN, gmail_claims(ADMIN_UID));
    verifier.register(FACULTY_TOKEN, gmail_claims(FACULTY_UID));
    verifier.register(STUDENT_TOKEN, gmail_claims(STUDENT_UID));
    verifier.register(NEWCOMER_TOKEN, gmail_claims(NEWCOMER_UID));
    Arc::new(verifier)
}

/// 预置管理员 / 教师 / 学生档案
pub fn seed_profiles(db_path: &str) -> Result<(), Box<dyn Error>> {
    let users = UserRepository::from_connection(shared_test_connection(db_path)?);

    let mut admin = UserProfile::first_sign_in(ADMIN_UID, "admin-1@gmail.com", None, None);
    admin.role = Role::Admin;
    users.upsert(&admin)?;

    let mut faculty = UserProfile::first_sign_in(FACULTY_UID, "fac-1@gmail.com", None, None);
    faculty.role = Role::Faculty;
    faculty.faculty_id = Some(FACULTY_ID.to_string());
    users.upsert(&faculty)?;

    let mut student = UserProfile::first_sign_in(STUDENT_UID, "stu-1@gmail.com", None, None);
    student.batch = Some(STUDENT_BATCH.to_string());
    users.upsert(&student)?;

    Ok(())
}

/// 测试环境：临时库 + 预置档案 + 应用状态
pub struct TestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub verifier: Arc<StaticTokenVerifier>,
    pub state: AppState,
}

impl TestEnv {
    /// 规划器未配置（生成走启发式）
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_planner(GenerativePlanner::unconfigured("test-model"))
    }

    pub fn with_planner(planner: GenerativePlanner) -> Result<Self, Box<dyn Error>> {
        let (temp_file, db_path) = create_test_db()?;
        seed_profiles(&db_path)?;
        let verifier = test_verifier();
        let state = AppState::with_planner(
            db_path.clone(),
            verifier.clone(),
            planner,
            Duration::from_secs(5),
        )?;
        Ok(Self {
            _temp_file: temp_file,
            db_path,
            verifier,
            state,
        })
    }
}
