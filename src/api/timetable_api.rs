// ==========================================
// 高校排课系统 - 课表文档 API
// ==========================================
// 管理员: 增删改查
// 教师视图: facultyIndex 包含本人教师标识的课表
// 学生视图: batchIndex 包含本人班级的课表（未设置班级时为空）
// ==========================================

use crate::api::dto::{DeletedAck, UpdatedAck};
use crate::api::error::{ApiError, ApiResult};
use crate::auth::{Authenticator, RequireRoles};
use crate::domain::timetable::Timetable;
use crate::repository::TimetableRepository;
use std::sync::Arc;
use tracing::{debug, info};

pub struct TimetableApi {
    auth: Arc<Authenticator>,
    repo: Arc<TimetableRepository>,
}

impl TimetableApi {
    pub fn new(auth: Arc<Authenticator>, repo: Arc<TimetableRepository>) -> Self {
        Self { auth, repo }
    }

    /// 新建课表（分配 id 与缺失的 slot id，重算索引）
    pub async fn create(&self, token: Option<&str>, timetable: &Timetable) -> ApiResult<Timetable> {
        let admin = self.auth.require(token, &RequireRoles::admin_only()).await?;
        let stored = self.repo.insert(timetable)?;
        info!(
            timetable_id = ?stored.id,
            slots = stored.slots.len(),
            by = %admin.uid,
            "课表已创建"
        );
        Ok(stored)
    }

    pub async fn list(&self, token: Option<&str>, department: Option<&str>) -> ApiResult<Vec<Timetable>> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        let department = department.filter(|d| !d.is_empty());
        Ok(self.repo.list(department)?)
    }

    pub async fn get(&self, token: Option<&str>, id: &str) -> ApiResult<Timetable> {
        self.auth.require(token, &RequireRoles::admin_only()).await?;
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("课表(id={})不存在", id)))
    }

    /// 按 id 整体替换课表
    pub async fn update(&self, token: Option<&str>, id: &str, timetable: &Timetable) -> ApiResult<UpdatedAck> {
        let admin = self.auth.require(token, &RequireRoles::admin_only()).await?;
        self.repo.replace(id, timetable)?;
        info!(timetable_id = id, by = %admin.uid, "课表已更新");
        Ok(UpdatedAck::ok())
    }

    pub async fn delete(&self, token: Option<&str>, id: &str) -> ApiResult<DeletedAck> {
        let admin = self.auth.require(token, &RequireRoles::admin_only()).await?;
        let deleted = self.repo.delete(id)?;
        info!(timetable_id = id, deleted, by = %admin.uid, "课表删除");
        Ok(DeletedAck { deleted })
    }

    /// 教师视图
    pub async fn faculty_view(&self, token: Option<&str>) -> ApiResult<Vec<Timetable>> {
        let caller = self.auth.require(token, &RequireRoles::faculty_or_admin()).await?;
        let faculty_key = caller.faculty_key();
        let found = self.repo.list_by_faculty(faculty_key)?;
        debug!(faculty = faculty_key, count = found.len(), "教师课表查询");
        Ok(found)
    }

    /// 学生视图
    pub async fn student_view(&self, token: Option<&str>) -> ApiResult<Vec<Timetable>> {
        let caller = self.auth.require(token, &RequireRoles::student_or_admin()).await?;
        let Some(batch) = caller.batch_key() else {
            return Ok(Vec::new());
        };
        Ok(self.repo.list_by_batch(batch)?)
    }
}
