// src/models/view.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::lead::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Everything the leads table view depends on. Filters use the `"all"` (or
/// empty) sentinel to mean "no constraint", exactly like the dropdowns that
/// feed them.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadQuery {
    /// Case-insensitive substring, matched across company, contact, email,
    /// website and product fields.
    pub search: Option<String>,
    pub status: Option<String>,
    pub funding_type: Option<String>,
    pub category: Option<String>,
    pub team_size: Option<String>,
    /// Field key to sort by (e.g. `arr`, `createdAt`, `companyName`).
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// One computed page of the leads table.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPage {
    pub rows: Vec<Lead>,
    #[schema(example = 60)]
    pub total_items: usize,
    #[schema(example = 3)]
    pub total_pages: usize,
    pub page: usize,
    /// 0-based index of the first row of this page within the filtered set.
    pub start_index: usize,
    /// Exclusive end index.
    pub end_index: usize,
}

/// Outcome of a read-time deduplication pass, surfaced so the UI can tell
/// the user how many rows were repaired away.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DedupReport {
    pub duplicate_count: usize,
    /// Ids of the leads dropped as duplicates.
    pub removed_ids: Vec<i64>,
}

/// Result of a bulk delete: individual failures do not abort the batch,
/// both tallies are reported.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteReport {
    #[schema(example = 4)]
    pub deleted: usize,
    #[schema(example = 1)]
    pub failed: usize,
    pub failed_ids: Vec<i64>,
}
