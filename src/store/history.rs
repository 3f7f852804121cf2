// src/store/history.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Remembers every normalized website URL the system has ever seen, with the
/// earliest creation timestamp observed for it. The map only grows: deleting
/// a lead does not forget its URL, which is what lets fresh-lead detection
/// tell a genuinely new lead from a re-entry of a historical one.
///
/// Keys are expected to be pre-normalized (see `services::dedup::normalize_url`).
#[derive(Debug, Default)]
pub struct HistoryTracker {
    seen: HashMap<String, DateTime<Utc>>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation of `url`, keeping the earliest timestamp known.
    pub fn record(&mut self, url: &str, created_at: DateTime<Utc>) {
        self.seen
            .entry(url.to_string())
            .and_modify(|first| {
                if created_at < *first {
                    *first = created_at;
                }
            })
            .or_insert(created_at);
    }

    /// True iff a lead with this URL was first seen strictly before `before`.
    pub fn was_previously_added(&self, url: &str, before: DateTime<Utc>) -> bool {
        self.seen.get(url).is_some_and(|first| *first < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_keeps_the_earliest_timestamp() {
        let mut history = HistoryTracker::new();
        let early = Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 8, 22, 9, 0, 0).unwrap();

        history.record("https://acme.com", late);
        history.record("https://acme.com", early);
        history.record("https://acme.com", late);

        assert!(history.was_previously_added("https://acme.com", late));
        assert!(!history.was_previously_added("https://acme.com", early));
    }

    #[test]
    fn unknown_urls_were_never_added() {
        let history = HistoryTracker::new();
        assert!(!history.was_previously_added("https://nobody.io", Utc::now()));
    }
}
