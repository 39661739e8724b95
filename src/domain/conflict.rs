// ==========================================
// 高校排课系统 - 冲突上报与调整建议
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 未指明类型时的冲突类型
pub const DEFAULT_CONFLICT_TYPE: &str = "overlap";

fn default_conflict_type() -> String {
    DEFAULT_CONFLICT_TYPE.to_string()
}

/// null / 空串按缺省类型处理
fn conflict_type_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let kind = Option::<String>::deserialize(deserializer)?;
    Ok(kind
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(default_conflict_type))
}

/// 时段标识可能是数字等非字符串值，统一转为文本
fn slot_id_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

// ==========================================
// ConflictReport - 上报的冲突
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    #[serde(
        rename = "type",
        default = "default_conflict_type",
        deserialize_with = "conflict_type_or_default"
    )]
    pub kind: String,
    #[serde(default, deserialize_with = "slot_id_as_text")]
    pub slot_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl ConflictReport {
    pub fn for_slot(slot_id: &str) -> Self {
        Self {
            kind: default_conflict_type(),
            slot_id: Some(slot_id.to_string()),
            start_time: None,
            end_time: None,
        }
    }
}

/// 冲突处理请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolutionRequest {
    pub timetable_id: String,
    pub conflicts: Vec<ConflictReport>,
}

// ==========================================
// ConflictSuggestion - 调整建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedPlacement {
    pub new_start: String,
    pub new_end: String,
    pub alternative_room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub slot_id: Option<String>,
    pub suggested: SuggestedPlacement,
}

/// 冲突处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResolutionResult {
    pub suggestions: Vec<ConflictSuggestion>,
}
