// src/models/column.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Select,
    Boolean,
    Url,
    Conditional,
}

/// One rule of a conditional column: when `condition` holds for a row the
/// cell shows `then_action`, otherwise `else_action` (if any).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    #[schema(example = "arr > 100000")]
    pub condition: String,
    #[schema(example = "Priority")]
    pub then_action: String,
    pub else_action: Option<String>,
}

/// Schema entry for one dynamic lead attribute. Default columns describe the
/// built-in lead fields and cannot be deleted or retyped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomColumn {
    pub id: i64,
    /// Display name, unique case-insensitively.
    #[schema(example = "Region")]
    pub name: String,
    /// Canonical storage key this column reads/writes on lead records.
    /// Resolved once at creation (see [`field_key_for`]) so every consumer
    /// agrees on the mapping.
    #[schema(example = "region")]
    pub field_key: String,
    pub column_type: ColumnType,
    pub required: bool,
    pub default_value: Option<Value>,
    /// Non-empty when `column_type` is `select`.
    #[serde(default)]
    pub select_options: Vec<String>,
    /// Non-empty when `column_type` is `conditional`.
    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
    pub is_default: bool,
    /// Display position, 1-based. Unique and dense after any reorder.
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub column_type: Option<ColumnType>,
    pub required: Option<bool>,
    pub default_value: Option<Value>,
    pub select_options: Option<Vec<String>>,
    pub conditional_rules: Option<Vec<ConditionalRule>>,
}

/// Display name → canonical storage key for the built-in lead fields. Any
/// other name falls back to lowercasing and stripping whitespace, which is
/// what the legacy tables did for every column.
pub fn field_key_for(name: &str) -> String {
    const BUILTINS: &[(&str, &str)] = &[
        ("Website URL", "websiteUrl"),
        ("Company Name", "companyName"),
        ("Contact Name", "contactName"),
        ("Email", "email"),
        ("LinkedIn URL", "linkedinUrl"),
        ("Category", "category"),
        ("Team Size", "teamSize"),
        ("ARR", "arr"),
        ("Status", "status"),
        ("Funding Type", "fundingType"),
        ("Follow Up Date", "followUpDate"),
        ("Edition", "edition"),
        ("Product Name", "productName"),
    ];

    for (display, key) in BUILTINS {
        if display.eq_ignore_ascii_case(name) {
            return (*key).to_string();
        }
    }
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_map_to_canonical_keys() {
        assert_eq!(field_key_for("Website URL"), "websiteUrl");
        assert_eq!(field_key_for("website url"), "websiteUrl");
        assert_eq!(field_key_for("ARR"), "arr");
    }

    #[test]
    fn unknown_names_lowercase_and_strip_whitespace() {
        assert_eq!(field_key_for("Deal Region Code"), "dealregioncode");
        assert_eq!(field_key_for("Region"), "region");
    }
}
