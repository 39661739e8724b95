// ==========================================
// 高校排课系统 - 课程目录导入
// ==========================================
// 流程: 文件解析 -> 表头归一化 -> 字段映射 -> Course
// 表头匹配不区分大小写，忽略 '_' 与空格
// 行级错误收集后继续处理后续行
// ==========================================

use crate::domain::course::{Course, DEFAULT_SESSIONS_PER_WEEK};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use serde_json::Map;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// 导入结果
#[derive(Debug, Default)]
pub struct CourseImportOutcome {
    pub courses: Vec<Course>,
    pub errors: Vec<ImportError>,
}

impl CourseImportOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 标准字段及可接受的表头别名（均为归一化形式）
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("code", &["code", "coursecode"]),
    ("name", &["name", "coursename", "title"]),
    ("facultyId", &["facultyid", "faculty"]),
    ("perWeek", &["perweek", "sessionsperweek"]),
    ("preferredRoomId", &["preferredroomid", "preferredroom", "roomid", "room"]),
    ("batch", &["batch"]),
    ("resources", &["resources", "resource"]),
];

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub struct CourseImporter {
    parser: UniversalFileParser,
}

impl Default for CourseImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
        }
    }

    /// 导入课程目录文件
    ///
    /// # 返回
    /// - Err: 文件级错误（不存在、格式不支持、无法解析）
    /// - Ok: 成功映射的课程与行级错误
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<CourseImportOutcome> {
        let path = path.as_ref();
        let records = self.parser.parse(path)?;

        let mut outcome = CourseImportOutcome::default();
        for record in &records {
            match self.map_record(record) {
                Ok(course) => outcome.courses.push(course),
                Err(e) => {
                    warn!(row = record.row, error = %e, "课程行导入失败");
                    outcome.errors.push(e);
                }
            }
        }

        info!(
            file = %path.display(),
            imported = outcome.courses.len(),
            failed = outcome.errors.len(),
            "课程目录导入完成"
        );
        Ok(outcome)
    }

    /// 单行映射为 Course
    pub fn map_record(&self, record: &RawRecord) -> ImportResult<Course> {
        let fields: HashMap<String, &str> = record
            .fields
            .iter()
            .map(|(k, v)| (normalize_header(k), v.trim()))
            .collect();

        let lookup = |field: &str| -> Option<String> {
            FIELD_ALIASES
                .iter()
                .find(|(name, _)| *name == field)
                .and_then(|(_, aliases)| {
                    aliases
                        .iter()
                        .filter_map(|a| fields.get(*a))
                        .find(|v| !v.is_empty())
                })
                .map(|v| v.to_string())
        };

        let required = |field: &str| -> ImportResult<String> {
            lookup(field).ok_or_else(|| ImportError::MissingField {
                row: record.row,
                field: field.to_string(),
            })
        };

        let code = required("code")?;
        let name = required("name")?;
        let faculty_id = required("facultyId")?;

        let per_week = match lookup("perWeek") {
            Some(raw) => parse_per_week(&raw).ok_or_else(|| ImportError::TypeConversionError {
                row: record.row,
                field: "perWeek".to_string(),
                message: format!("非数字: {}", raw),
            })?,
            None => DEFAULT_SESSIONS_PER_WEEK,
        };

        let resources = lookup("resources")
            .map(|raw| {
                raw.split([';', '|'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|tags| !tags.is_empty());

        Ok(Course {
            code,
            name,
            faculty_id,
            per_week,
            preferred_room_id: lookup("preferredRoomId"),
            batch: lookup("batch"),
            resources,
            extra: Map::new(),
        })
    }
}

/// Excel 数值单元格可能带 ".0"
fn parse_per_week(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Faculty_Id"), "facultyid");
        assert_eq!(normalize_header("Per Week"), "perweek");
        assert_eq!(normalize_header("preferredRoomId"), "preferredroomid");
    }

    #[test]
    fn test_map_full_record() {
        let importer = CourseImporter::new();
        let course = importer
            .map_record(&record(
                2,
                &[
                    ("Code", "CS101"),
                    ("Name", "Intro"),
                    ("faculty_id", "F1"),
                    ("Per Week", "3"),
                    ("preferred_room_id", "R1"),
                    ("Batch", "B1"),
                    ("Resources", "projector; lab | "),
                ],
            ))
            .unwrap();

        assert_eq!(course.code, "CS101");
        assert_eq!(course.faculty_id, "F1");
        assert_eq!(course.per_week, 3);
        assert_eq!(course.preferred_room_id.as_deref(), Some("R1"));
        assert_eq!(course.batch.as_deref(), Some("B1"));
        assert_eq!(
            course.resources,
            Some(vec!["projector".to_string(), "lab".to_string()])
        );
    }

    #[test]
    fn test_defaults_when_optional_columns_blank() {
        let course = CourseImporter::new()
            .map_record(&record(
                2,
                &[("code", "CS1"), ("name", "N"), ("facultyId", "F"), ("perWeek", "")],
            ))
            .unwrap();
        assert_eq!(course.per_week, DEFAULT_SESSIONS_PER_WEEK);
        assert!(course.preferred_room_id.is_none());
        assert!(course.resources.is_none());
    }

    #[test]
    fn test_missing_required_field_reports_row() {
        let err = CourseImporter::new()
            .map_record(&record(7, &[("code", "CS1"), ("name", "N")]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 7, ref field } if field == "facultyId"));
    }

    #[test]
    fn test_non_numeric_per_week() {
        let err = CourseImporter::new()
            .map_record(&record(
                3,
                &[("code", "CS1"), ("name", "N"), ("facultyId", "F"), ("perWeek", "two")],
            ))
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 3, .. }));
    }

    #[test]
    fn test_excel_style_float_per_week() {
        assert_eq!(parse_per_week("2.0"), Some(2));
        assert_eq!(parse_per_week("2.5"), None);
        assert_eq!(parse_per_week("-1"), None);
    }
}
