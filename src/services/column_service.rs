// src/services/column_service.rs

use crate::common::error::AppError;
use crate::models::column::{ColumnPatch, ColumnType, CustomColumn};
use crate::store::column_repo::NewColumn;
use crate::store::{ColumnOrderStore, ColumnRepository};

#[derive(Clone)]
pub struct ColumnService {
    repo: ColumnRepository,
    order_store: ColumnOrderStore,
}

impl ColumnService {
    /// Wires the repository to the persisted display order: a saved order
    /// from a previous session is re-applied on construction.
    pub fn new(repo: ColumnRepository, order_store: ColumnOrderStore) -> Self {
        if let Some(saved) = order_store.load() {
            repo.reorder(&saved);
        }
        Self { repo, order_store }
    }

    pub fn list(&self) -> Vec<CustomColumn> {
        self.repo.list()
    }

    pub fn create(&self, input: NewColumn) -> Result<CustomColumn, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::invalid_field(
                "name",
                "required",
                "Column name is required",
            ));
        }
        self.validate_shape(input.column_type, &input.select_options, &input.conditional_rules)?;
        self.repo.create(input)
    }

    pub fn update(&self, id: i64, patch: ColumnPatch) -> Result<CustomColumn, AppError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_field(
                    "name",
                    "required",
                    "Column name is required",
                ));
            }
        }
        if let Some(new_type) = patch.column_type {
            // Validate against the options/rules the column will end up
            // with, whether they come from the patch or are already stored.
            let current = self.repo.get(id)?;
            let options = patch
                .select_options
                .as_ref()
                .unwrap_or(&current.select_options);
            let rules = patch
                .conditional_rules
                .as_ref()
                .unwrap_or(&current.conditional_rules);
            self.validate_shape(new_type, options, rules)?;
        }
        self.repo.update(id, patch)
    }

    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete(id)
    }

    /// Apply a new display order and persist it. Persistence is best
    /// effort, like the browser storage it replaces: a write failure is
    /// logged, the in-memory order stands.
    pub fn reorder(&self, ids_in_new_order: &[i64]) -> Vec<CustomColumn> {
        let columns = self.repo.reorder(ids_in_new_order);
        let full_order: Vec<i64> = columns.iter().map(|c| c.id).collect();
        if let Err(e) = self.order_store.save(&full_order) {
            tracing::warn!(error = %e, "column order not persisted");
        }
        columns
    }

    /// Wait for the next saved order. Resolves with the ids in their new
    /// display order once a reorder is persisted anywhere; a subscription
    /// that cannot keep up falls back to the current order.
    pub async fn next_order_change(&self) -> Vec<i64> {
        let mut rx = self.order_store.subscribe();
        match rx.recv().await {
            Ok(order) => order,
            Err(_) => self.list().iter().map(|c| c.id).collect(),
        }
    }

    fn validate_shape(
        &self,
        column_type: ColumnType,
        select_options: &[String],
        conditional_rules: &[crate::models::column::ConditionalRule],
    ) -> Result<(), AppError> {
        match column_type {
            ColumnType::Select if select_options.is_empty() => Err(AppError::invalid_field(
                "selectOptions",
                "required",
                "Select columns need at least one option",
            )),
            ColumnType::Conditional if conditional_rules.is_empty() => {
                Err(AppError::invalid_field(
                    "conditionalRules",
                    "required",
                    "Conditional columns need at least one rule",
                ))
            }
            _ => Ok(()),
        }
    }
}
