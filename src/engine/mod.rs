// ==========================================
// 高校排课系统 - 引擎层
// ==========================================
// 职责: 课表生成、规划器适配、冲突检测与调整建议
// 红线: Engine 不拼 SQL, 不触碰存储
// ==========================================

pub mod conflict_detector;
pub mod conflict_resolver;
pub mod heuristic;
pub mod orchestrator;
pub mod planner;

// 重导出核心引擎
pub use conflict_detector::{ConflictDetector, ConflictKind, DetectedConflict};
pub use conflict_resolver::ConflictResolver;
pub use heuristic::HeuristicGenerator;
pub use orchestrator::{FallbackReason, GenerationReport, GenerationSource, ScheduleOrchestrator};
pub use planner::{GenerativePlanner, PlannerError};
