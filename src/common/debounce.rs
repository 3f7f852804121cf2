// src/common/debounce.rs

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// How long a cell edit may sit before it is committed.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

type Key = (i64, String);

/// Per-`(record id, field)` commit timers. Scheduling a commit for a key
/// that already has one pending aborts the pending timer and restarts the
/// window, so rapid edits to the same cell persist only the latest value.
/// Edits to different cells never interfere with each other.
#[derive(Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Arc<Mutex<HashMap<Key, (u64, JoinHandle<()>)>>>,
    generation: Arc<Mutex<u64>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(Mutex::new(0)),
        }
    }

    /// Schedule `commit` to run after the debounce window, superseding any
    /// commit already pending for the same `(record_id, field)`.
    pub fn schedule<F, Fut>(&self, record_id: i64, field: &str, commit: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let key: Key = (record_id, field.to_string());
        let generation = {
            let mut g = self.generation.lock().unwrap();
            *g += 1;
            *g
        };

        let window = self.window;
        let pending = Arc::clone(&self.pending);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Drop our own map entry first, but only if it is still ours:
            // a newer timer for this key owns the entry now.
            {
                let mut map = pending.lock().unwrap();
                match map.get(&task_key) {
                    Some((owner, _)) if *owner == generation => {
                        map.remove(&task_key);
                    }
                    _ => return,
                }
            }
            commit().await;
        });

        let mut map = self.pending.lock().unwrap();
        if let Some((_, old)) = map.insert(key, (generation, handle)) {
            old.abort();
        }
    }

    /// Drop every pending commit for a record without running it, for when
    /// the record is deleted while edits are still in flight.
    pub fn cancel_record(&self, record_id: i64) {
        self.pending.lock().unwrap().retain(|(id, _), (_, handle)| {
            if *id == record_id {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}
