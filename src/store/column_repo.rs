// src/store/column_repo.rs

use chrono::Utc;

use crate::common::error::AppError;
use crate::models::column::{ColumnPatch, ColumnType, ConditionalRule, CustomColumn, field_key_for};
use crate::store::memory::Store;

#[derive(Clone)]
pub struct ColumnRepository {
    store: Store,
}

/// Creation input as the repository needs it; the service layer validates
/// the shape (non-empty name, options for selects) before it gets here.
#[derive(Debug, Clone)]
pub struct NewColumn {
    pub name: String,
    pub column_type: ColumnType,
    pub required: bool,
    pub default_value: Option<serde_json::Value>,
    pub select_options: Vec<String>,
    pub conditional_rules: Vec<ConditionalRule>,
}

impl ColumnRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All columns, sorted by display order.
    pub fn list(&self) -> Vec<CustomColumn> {
        let mut columns = self.store.columns.read().unwrap().clone();
        columns.sort_by_key(|c| c.order);
        columns
    }

    pub fn get(&self, id: i64) -> Result<CustomColumn, AppError> {
        self.store
            .columns
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("column", id))
    }

    pub fn create(&self, input: NewColumn) -> Result<CustomColumn, AppError> {
        let mut columns = self.store.columns.write().unwrap();
        if columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&input.name))
        {
            return Err(AppError::Conflict(format!(
                "A column named '{}' already exists",
                input.name
            )));
        }

        let id = columns.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let order = columns.iter().map(|c| c.order).max().unwrap_or(0) + 1;
        let column = CustomColumn {
            id,
            // The storage key is fixed here, once; renames later keep it so
            // values already written to leads stay reachable.
            field_key: field_key_for(&input.name),
            name: input.name,
            column_type: input.column_type,
            required: input.required,
            default_value: input.default_value,
            select_options: input.select_options,
            conditional_rules: input.conditional_rules,
            is_default: false,
            order,
            created_at: Utc::now(),
        };
        columns.push(column.clone());
        Ok(column)
    }

    pub fn update(&self, id: i64, patch: ColumnPatch) -> Result<CustomColumn, AppError> {
        let mut columns = self.store.columns.write().unwrap();

        if let Some(name) = &patch.name {
            if columns
                .iter()
                .any(|c| c.id != id && c.name.eq_ignore_ascii_case(name))
            {
                return Err(AppError::Conflict(format!(
                    "A column named '{name}' already exists"
                )));
            }
        }

        let column = columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("column", id))?;

        if let Some(new_type) = patch.column_type {
            if column.is_default && new_type != column.column_type {
                return Err(AppError::Forbidden(format!(
                    "Default column '{}' cannot change type",
                    column.name
                )));
            }
            column.column_type = new_type;
        }
        if let Some(name) = patch.name {
            column.name = name;
        }
        if let Some(required) = patch.required {
            column.required = required;
        }
        if let Some(default_value) = patch.default_value {
            column.default_value = Some(default_value);
        }
        if let Some(select_options) = patch.select_options {
            column.select_options = select_options;
        }
        if let Some(conditional_rules) = patch.conditional_rules {
            column.conditional_rules = conditional_rules;
        }

        Ok(column.clone())
    }

    /// Delete a non-default column. Values already stored on leads under
    /// this column's key are left in place; the view layer only projects
    /// keys present in the active schema.
    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut columns = self.store.columns.write().unwrap();
        let column = columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("column", id))?;
        if column.is_default {
            return Err(AppError::Forbidden(format!(
                "Default column '{}' cannot be deleted",
                column.name
            )));
        }
        columns.retain(|c| c.id != id);
        Ok(())
    }

    /// Assign display order by the given id sequence: listed columns come
    /// first in that order, columns not listed keep their relative order and
    /// follow. Orders come out dense (1-based) either way. Unknown ids are
    /// ignored.
    pub fn reorder(&self, ids_in_new_order: &[i64]) -> Vec<CustomColumn> {
        let mut columns = self.store.columns.write().unwrap();

        let mut sequence: Vec<i64> = ids_in_new_order
            .iter()
            .copied()
            .filter(|id| columns.iter().any(|c| c.id == *id))
            .collect();
        let mut remainder: Vec<&CustomColumn> = columns
            .iter()
            .filter(|c| !sequence.contains(&c.id))
            .collect();
        remainder.sort_by_key(|c| c.order);
        sequence.extend(remainder.iter().map(|c| c.id));

        for column in columns.iter_mut() {
            // Every id is in the sequence by construction.
            let position = sequence.iter().position(|id| *id == column.id).unwrap();
            column.order = position as i32 + 1;
        }

        let mut result = columns.clone();
        result.sort_by_key(|c| c.order);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::Database;

    fn repo() -> ColumnRepository {
        ColumnRepository::new(Database::new())
    }

    fn new_column(name: &str, column_type: ColumnType) -> NewColumn {
        NewColumn {
            name: name.to_string(),
            column_type,
            required: false,
            default_value: None,
            select_options: Vec::new(),
            conditional_rules: Vec::new(),
        }
    }

    #[test]
    fn create_assigns_next_id_order_and_field_key() {
        let repo = repo();
        let before = repo.list();
        let max_id = before.iter().map(|c| c.id).max().unwrap();
        let max_order = before.iter().map(|c| c.order).max().unwrap();

        let column = repo.create(new_column("Region", ColumnType::Text)).unwrap();
        assert_eq!(column.id, max_id + 1);
        assert_eq!(column.order, max_order + 1);
        assert_eq!(column.field_key, "region");
        assert!(!column.is_default);
    }

    #[test]
    fn names_are_unique_case_insensitively() {
        let repo = repo();
        repo.create(new_column("Region", ColumnType::Text)).unwrap();
        assert!(matches!(
            repo.create(new_column("REGION", ColumnType::Text)),
            Err(AppError::Conflict(_))
        ));
        // Collides with a seeded default column too.
        assert!(matches!(
            repo.create(new_column("email", ColumnType::Text)),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn default_columns_cannot_be_deleted_or_retyped() {
        let repo = repo();
        let default = repo.list().into_iter().find(|c| c.is_default).unwrap();

        assert!(matches!(
            repo.delete(default.id),
            Err(AppError::Forbidden(_))
        ));
        let patch = ColumnPatch {
            column_type: Some(ColumnType::Number),
            ..ColumnPatch::default()
        };
        assert!(matches!(
            repo.update(default.id, patch),
            Err(AppError::Forbidden(_))
        ));

        // Non-type updates to defaults are fine.
        let patch = ColumnPatch {
            required: Some(true),
            ..ColumnPatch::default()
        };
        assert!(repo.update(default.id, patch).is_ok());
    }

    #[test]
    fn delete_removes_custom_columns() {
        let repo = repo();
        let column = repo.create(new_column("Region", ColumnType::Text)).unwrap();
        repo.delete(column.id).unwrap();
        assert!(matches!(
            repo.delete(column.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn reorder_is_deterministic_and_append_safe() {
        let repo = repo();
        let a = repo.create(new_column("Alpha", ColumnType::Text)).unwrap();
        let b = repo.create(new_column("Beta", ColumnType::Text)).unwrap();
        let c = repo.create(new_column("Gamma", ColumnType::Text)).unwrap();
        let default_names: Vec<String> = repo
            .list()
            .into_iter()
            .filter(|col| col.is_default)
            .map(|col| col.name)
            .collect();

        // Full permutation of the three customs, defaults omitted: listed
        // ids lead, the omitted defaults follow in their previous relative
        // order.
        let result = repo.reorder(&[c.id, a.id, b.id]);
        let head: Vec<i64> = result.iter().take(3).map(|col| col.id).collect();
        assert_eq!(head, vec![c.id, a.id, b.id]);

        let tail_names: Vec<String> = result.iter().skip(3).map(|col| col.name.clone()).collect();
        assert_eq!(tail_names, default_names);

        // Dense 1-based orders all the way down.
        for (i, col) in result.iter().enumerate() {
            assert_eq!(col.order, i as i32 + 1);
        }
    }

    #[test]
    fn reorder_ignores_unknown_ids() {
        let repo = repo();
        let a = repo.create(new_column("Alpha", ColumnType::Text)).unwrap();
        let result = repo.reorder(&[9999, a.id]);
        assert_eq!(result[0].id, a.id);
    }
}
