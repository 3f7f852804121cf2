// src/services/dedup.rs
//
// The lead deduplication engine. Everything here is pure: the repository
// layer owns the side effects (shrinking the backing collection, recording
// observed URLs in the history tracker).

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::lead::Lead;
use crate::store::history::HistoryTracker;

/// Canonical form of a website URL for duplicate comparison: lowercased,
/// with exactly one trailing slash stripped. `https://Foo.com/` and
/// `https://foo.com` collide; `https://foo.com//` keeps one slash.
pub fn normalize_url(url: &str) -> String {
    let lowered = url.to_lowercase();
    match lowered.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

#[derive(Debug, Clone)]
pub struct DedupOutcome {
    /// The surviving leads, in their original collection order.
    pub unique: Vec<Lead>,
    /// The leads classified as duplicates, most recent first.
    pub removed: Vec<Lead>,
    pub duplicate_count: usize,
}

/// Partition a lead collection into unique leads and duplicates. For each
/// normalized URL the lead with the latest `created_at` wins; every other
/// lead sharing the key is a duplicate. Idempotent: a second pass over
/// `unique` finds nothing to remove.
pub fn deduplicate(leads: &[Lead]) -> DedupOutcome {
    // Walk in recency order so the first lead seen per key is the keeper.
    // Stable sort: equal timestamps keep collection order, earlier row wins.
    let mut by_recency: Vec<&Lead> = leads.iter().collect();
    by_recency.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut keep_ids = std::collections::HashSet::new();
    let mut seen_urls = std::collections::HashSet::new();
    let mut removed = Vec::new();
    for lead in by_recency {
        let key = normalize_url(&lead.website_url);
        if seen_urls.insert(key) {
            keep_ids.insert(lead.id);
        } else {
            removed.push(lead.clone());
        }
    }

    // Survivors in original order so downstream insertion-order tie-breaks
    // stay meaningful.
    let unique: Vec<Lead> = leads
        .iter()
        .filter(|l| keep_ids.contains(&l.id))
        .cloned()
        .collect();

    DedupOutcome {
        unique,
        duplicate_count: removed.len(),
        removed,
    }
}

/// True iff `lead` was created on `as_of` (calendar day, UTC) and no lead
/// with the same normalized URL was ever seen before that day. Same-day
/// re-entries of historical URLs are not fresh.
pub fn is_fresh_lead(lead: &Lead, as_of: NaiveDate, history: &HistoryTracker) -> bool {
    if lead.created_at.date_naive() != as_of {
        return false;
    }
    let day_start: DateTime<Utc> = as_of
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc();
    !history.was_previously_added(&normalize_url(&lead.website_url), day_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Map;

    use crate::models::lead::LeadStatus;

    fn lead(id: i64, url: &str, created_at: DateTime<Utc>) -> Lead {
        Lead {
            id,
            website_url: url.to_string(),
            company_name: None,
            contact_name: None,
            email: None,
            linkedin_url: None,
            category: None,
            team_size: "1-3".to_string(),
            arr: None,
            status: LeadStatus::NewLead,
            funding_type: "Bootstrapped".to_string(),
            follow_up_date: None,
            edition: None,
            product_name: None,
            custom_data: Map::new(),
            created_at,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn normalization_is_case_and_trailing_slash_insensitive() {
        assert_eq!(normalize_url("https://Foo.com/"), normalize_url("https://foo.com"));
        assert_eq!(normalize_url("https://foo.com//"), "https://foo.com/");
        assert_eq!(normalize_url("https://foo.com"), "https://foo.com");
    }

    #[test]
    fn most_recent_lead_wins() {
        let leads = vec![
            lead(1, "https://acme.com", at(20, 9)),
            lead(2, "https://ACME.com/", at(22, 9)),
            lead(3, "https://other.io", at(21, 9)),
        ];
        let outcome = deduplicate(&leads);
        assert_eq!(outcome.duplicate_count, 1);
        let ids: Vec<i64> = outcome.unique.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(outcome.removed[0].id, 1);
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let leads = vec![
            lead(1, "https://acme.com", at(20, 9)),
            lead(2, "https://acme.com/", at(21, 9)),
            lead(3, "https://acme.com", at(22, 9)),
        ];
        let first = deduplicate(&leads);
        assert_eq!(first.duplicate_count, 2);
        let second = deduplicate(&first.unique);
        assert_eq!(second.duplicate_count, 0);
        assert_eq!(second.unique.len(), first.unique.len());
    }

    #[test]
    fn survivors_keep_collection_order() {
        let leads = vec![
            lead(1, "https://a.com", at(20, 9)),
            lead(2, "https://b.com", at(22, 9)),
            lead(3, "https://c.com", at(21, 9)),
        ];
        let outcome = deduplicate(&leads);
        let ids: Vec<i64> = outcome.unique.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn fresh_lead_requires_no_earlier_history() {
        let mut history = HistoryTracker::new();
        let today = at(23, 10).date_naive();

        let organic = lead(1, "https://new.io", at(23, 10));
        history.record("https://new.io", organic.created_at);
        assert!(is_fresh_lead(&organic, today, &history));

        // Same URL existed two days earlier: today's re-entry is not fresh.
        let reentry = lead(2, "https://old.io", at(23, 11));
        history.record("https://old.io", at(21, 8));
        assert!(!is_fresh_lead(&reentry, today, &history));

        // Created yesterday: not fresh for today regardless of history.
        let stale = lead(3, "https://mid.io", at(22, 10));
        history.record("https://mid.io", stale.created_at);
        assert!(!is_fresh_lead(&stale, today, &history));
    }
}
