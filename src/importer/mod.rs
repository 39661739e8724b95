// ==========================================
// 高校排课系统 - 导入层
// ==========================================
// 职责: CSV / Excel 课程目录导入
// ==========================================

pub mod course_importer;
pub mod error;
pub mod file_parser;

pub use course_importer::{CourseImportOutcome, CourseImporter};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
