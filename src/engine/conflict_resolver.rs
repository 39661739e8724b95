// ==========================================
// 高校排课系统 - 冲突调整建议
// ==========================================
// 契约: 每条冲突恰好一条建议，顺序不变，无副作用，不失败
// 缺省: 未给出起止时间时建议 10:00-10:50；备用教室固定
// ==========================================

use crate::domain::conflict::{
    ConflictReport, ConflictResolutionRequest, ConflictResolutionResult, ConflictSuggestion,
    SuggestedPlacement,
};
use tracing::debug;

pub const DEFAULT_SUGGESTED_START: &str = "10:00";
pub const DEFAULT_SUGGESTED_END: &str = "10:50";
pub const ALTERNATIVE_ROOM_ID: &str = "R-ALT-101";

#[derive(Debug, Default, Clone, Copy)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }

    /// 为每条冲突生成调整建议
    pub fn resolve(&self, conflicts: &[ConflictReport]) -> Vec<ConflictSuggestion> {
        conflicts.iter().map(suggest).collect()
    }

    /// 处理完整的冲突处理请求
    pub fn resolve_request(&self, req: &ConflictResolutionRequest) -> ConflictResolutionResult {
        let suggestions = self.resolve(&req.conflicts);
        debug!(
            timetable_id = %req.timetable_id,
            conflicts = req.conflicts.len(),
            "冲突建议已生成"
        );
        ConflictResolutionResult { suggestions }
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

fn suggest(conflict: &ConflictReport) -> ConflictSuggestion {
    ConflictSuggestion {
        kind: conflict.kind.clone(),
        slot_id: conflict.slot_id.clone(),
        suggested: SuggestedPlacement {
            new_start: or_default(conflict.start_time.as_deref(), DEFAULT_SUGGESTED_START),
            new_end: or_default(conflict.end_time.as_deref(), DEFAULT_SUGGESTED_END),
            alternative_room_id: ALTERNATIVE_ROOM_ID.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_suggestion_per_conflict_in_order() {
        let conflicts = vec![
            ConflictReport::for_slot("s-3"),
            ConflictReport::for_slot("s-1"),
            ConflictReport::for_slot("s-2"),
        ];
        let out = ConflictResolver::new().resolve(&conflicts);
        let ids: Vec<_> = out.iter().map(|s| s.slot_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["s-3", "s-1", "s-2"]);
        assert!(out.iter().all(|s| s.suggested.alternative_room_id == "R-ALT-101"));
    }

    #[test]
    fn test_defaults_when_times_missing() {
        let out = ConflictResolver::new().resolve(&[ConflictReport::for_slot("s-1")]);
        assert_eq!(out[0].suggested.new_start, "10:00");
        assert_eq!(out[0].suggested.new_end, "10:50");
        assert_eq!(out[0].kind, "overlap");
    }

    #[test]
    fn test_reported_times_are_echoed() {
        let mut conflict = ConflictReport::for_slot("s-1");
        conflict.kind = "room_overlap".to_string();
        conflict.start_time = Some("14:00".to_string());
        let out = ConflictResolver::new().resolve(&[conflict]);
        assert_eq!(out[0].kind, "room_overlap");
        assert_eq!(out[0].suggested.new_start, "14:00");
        assert_eq!(out[0].suggested.new_end, "10:50");
    }

    #[test]
    fn test_loosely_typed_reports_are_defaulted() {
        let req: ConflictResolutionRequest = serde_json::from_value(serde_json::json!({
            "timetableId": "t1",
            "conflicts": [{"type": null, "slotId": 7}]
        }))
        .unwrap();
        let result = ConflictResolver::new().resolve_request(&req);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].kind, "overlap");
        assert_eq!(result.suggestions[0].slot_id.as_deref(), Some("7"));
        assert_eq!(result.suggestions[0].suggested.new_start, "10:00");
    }

    #[test]
    fn test_empty_input() {
        let result = ConflictResolver::new().resolve_request(&ConflictResolutionRequest {
            timetable_id: "tt-1".to_string(),
            conflicts: vec![],
        });
        assert!(result.suggestions.is_empty());
    }
}
