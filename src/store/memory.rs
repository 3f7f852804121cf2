// src/store/memory.rs

use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::models::column::{ColumnType, CustomColumn, field_key_for};
use crate::models::deal::Deal;
use crate::models::lead::Lead;
use crate::store::history::HistoryTracker;

/// The backing store: one lock per collection, shared by every repository.
/// Built once at startup and injected, so tests get full isolation from a
/// fresh instance.
pub struct Database {
    pub(crate) leads: RwLock<Vec<Lead>>,
    pub(crate) deals: RwLock<Vec<Deal>>,
    pub(crate) columns: RwLock<Vec<CustomColumn>>,
    pub(crate) history: RwLock<HistoryTracker>,
}

pub type Store = Arc<Database>;

impl Database {
    /// Fresh store seeded with the default column schema for the built-in
    /// lead fields.
    pub fn new() -> Store {
        Arc::new(Self {
            leads: RwLock::new(Vec::new()),
            deals: RwLock::new(Vec::new()),
            columns: RwLock::new(default_columns()),
            history: RwLock::new(HistoryTracker::new()),
        })
    }
}

/// The built-in leads-table schema. These rows are what `isDefault`
/// protects: they can be reordered but never deleted or retyped.
fn default_columns() -> Vec<CustomColumn> {
    const DEFAULTS: &[(&str, ColumnType, bool)] = &[
        ("Website URL", ColumnType::Url, true),
        ("Company Name", ColumnType::Text, false),
        ("Contact Name", ColumnType::Text, false),
        ("Email", ColumnType::Text, false),
        ("LinkedIn URL", ColumnType::Url, false),
        ("Category", ColumnType::Text, false),
        ("Team Size", ColumnType::Select, false),
        ("ARR", ColumnType::Number, false),
        ("Status", ColumnType::Select, false),
        ("Funding Type", ColumnType::Select, false),
        ("Follow Up Date", ColumnType::Date, false),
        ("Edition", ColumnType::Text, false),
        ("Product Name", ColumnType::Text, false),
    ];

    let now = Utc::now();
    DEFAULTS
        .iter()
        .enumerate()
        .map(|(i, (name, column_type, required))| CustomColumn {
            id: i as i64 + 1,
            name: (*name).to_string(),
            field_key: field_key_for(name),
            column_type: *column_type,
            required: *required,
            default_value: None,
            select_options: Vec::new(),
            conditional_rules: Vec::new(),
            is_default: true,
            order: i as i32 + 1,
            created_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_seeds_default_columns_in_dense_order() {
        let store = Database::new();
        let columns = store.columns.read().unwrap();
        assert!(!columns.is_empty());
        for (i, col) in columns.iter().enumerate() {
            assert_eq!(col.order, i as i32 + 1);
            assert!(col.is_default);
        }
    }
}
