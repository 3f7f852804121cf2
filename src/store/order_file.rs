// src/store/order_file.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::broadcast;

use crate::common::error::AppError;

const ORDER_FILE: &str = "column_order.json";

/// Persists the global column display order (an array of column ids shared
/// by every table view) and broadcasts each change so other live views can
/// resynchronize without a reload.
#[derive(Clone)]
pub struct ColumnOrderStore {
    path: PathBuf,
    changes: broadcast::Sender<Vec<i64>>,
}

impl ColumnOrderStore {
    pub fn new(data_dir: &Path) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            path: data_dir.join(ORDER_FILE),
            changes,
        }
    }

    /// The saved order, or `None` when the file is absent or unreadable.
    /// Malformed content is logged and treated as absent, never propagated:
    /// a corrupt order file must not take the table down.
    pub fn load(&self) -> Option<Vec<i64>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed column order file");
                None
            }
        }
    }

    /// Re-serialize the order and notify subscribers.
    pub fn save(&self, order: &[i64]) -> Result<(), AppError> {
        let json = serde_json::to_string(order).context("serializing column order")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        // No subscribers is fine.
        let _ = self.changes.send(order.to_vec());
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Vec<i64>> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_notifies_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let store = ColumnOrderStore::new(dir.path());
        let mut rx = store.subscribe();

        store.save(&[3, 1, 2]).unwrap();
        assert_eq!(store.load(), Some(vec![3, 1, 2]));
        assert_eq!(rx.try_recv().unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn absent_or_malformed_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ColumnOrderStore::new(dir.path());
        assert_eq!(store.load(), None);

        std::fs::write(dir.path().join(ORDER_FILE), "{not json").unwrap();
        assert_eq!(store.load(), None);
    }
}
