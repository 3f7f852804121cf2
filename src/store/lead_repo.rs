// src/store/lead_repo.rs

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::common::error::AppError;
use crate::models::lead::{Lead, LeadPatch, LeadStatus, NewLead};
use crate::models::view::{BulkDeleteReport, DedupReport};
use crate::services::dedup;
use crate::store::memory::Store;

const DEFAULT_TEAM_SIZE: &str = "1-3";
const DEFAULT_FUNDING_TYPE: &str = "Bootstrapped";

#[derive(Clone)]
pub struct LeadRepository {
    store: Store,
}

impl LeadRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a lead. The website URL is required and must be unique among
    /// active leads after normalization; this write-time check is the fast
    /// path, the read-time dedup pass in [`list`](Self::list) is the backstop.
    /// Every omitted optional attribute gets its documented default.
    pub fn create(&self, input: NewLead) -> Result<Lead, AppError> {
        if input.website_url.trim().is_empty() {
            return Err(AppError::invalid_field(
                "websiteUrl",
                "required",
                "Website URL is required",
            ));
        }

        let key = dedup::normalize_url(&input.website_url);
        let mut leads = self.store.leads.write().unwrap();
        if leads
            .iter()
            .any(|l| dedup::normalize_url(&l.website_url) == key)
        {
            return Err(AppError::Conflict(format!(
                "A lead with website '{}' already exists",
                input.website_url
            )));
        }

        let id = leads.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let created_at = Utc::now();
        let lead = Lead {
            id,
            website_url: input.website_url,
            company_name: input.company_name,
            contact_name: input.contact_name,
            email: input.email,
            linkedin_url: input.linkedin_url,
            category: input.category,
            team_size: input.team_size.unwrap_or_else(|| DEFAULT_TEAM_SIZE.to_string()),
            arr: input.arr,
            status: input.status.unwrap_or(LeadStatus::NewLead),
            funding_type: input
                .funding_type
                .unwrap_or_else(|| DEFAULT_FUNDING_TYPE.to_string()),
            follow_up_date: input.follow_up_date,
            edition: input.edition,
            product_name: input.product_name,
            custom_data: input.custom_data,
            created_at,
        };
        leads.push(lead.clone());
        // URL history is permanent, recorded even if this lead is later
        // deleted.
        self.store.history.write().unwrap().record(&key, created_at);

        Ok(lead)
    }

    pub fn get(&self, id: i64) -> Result<Lead, AppError> {
        self.store
            .leads
            .read()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("lead", id))
    }

    /// The active lead set. Runs the deduplication repair pass as a side
    /// effect: duplicates are dropped from the backing collection and every
    /// observed URL is recorded in history. The report is `Some` only when
    /// the pass actually removed something.
    pub fn list(&self) -> (Vec<Lead>, Option<DedupReport>) {
        let mut leads = self.store.leads.write().unwrap();

        {
            let mut history = self.store.history.write().unwrap();
            for lead in leads.iter() {
                history.record(&dedup::normalize_url(&lead.website_url), lead.created_at);
            }
        }

        let outcome = dedup::deduplicate(&leads);
        let report = if outcome.duplicate_count > 0 {
            tracing::info!(
                removed = outcome.duplicate_count,
                "dedup pass repaired lead collection"
            );
            *leads = outcome.unique.clone();
            Some(DedupReport {
                duplicate_count: outcome.duplicate_count,
                removed_ids: outcome.removed.iter().map(|l| l.id).collect(),
            })
        } else {
            None
        };

        (outcome.unique, report)
    }

    /// Merge a partial update. A changed website URL is re-validated against
    /// the rest of the active set, so an edit cannot quietly reintroduce a
    /// duplicate. `created_at` is immutable.
    pub fn update(&self, id: i64, patch: LeadPatch) -> Result<Lead, AppError> {
        let mut leads = self.store.leads.write().unwrap();

        if let Some(url) = &patch.website_url {
            if url.trim().is_empty() {
                return Err(AppError::invalid_field(
                    "websiteUrl",
                    "required",
                    "Website URL is required",
                ));
            }
            let key = dedup::normalize_url(url);
            if leads
                .iter()
                .any(|l| l.id != id && dedup::normalize_url(&l.website_url) == key)
            {
                return Err(AppError::Conflict(format!(
                    "A lead with website '{url}' already exists"
                )));
            }
        }

        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("lead", id))?;

        if let Some(url) = patch.website_url {
            lead.website_url = url;
        }
        if let Some(v) = patch.company_name {
            lead.company_name = Some(v);
        }
        if let Some(v) = patch.contact_name {
            lead.contact_name = Some(v);
        }
        if let Some(v) = patch.email {
            lead.email = Some(v);
        }
        if let Some(v) = patch.linkedin_url {
            lead.linkedin_url = Some(v);
        }
        if let Some(v) = patch.category {
            lead.category = Some(v);
        }
        if let Some(v) = patch.team_size {
            lead.team_size = v;
        }
        if let Some(v) = patch.arr {
            lead.arr = Some(v);
        }
        if let Some(v) = patch.status {
            lead.status = v;
        }
        if let Some(v) = patch.funding_type {
            lead.funding_type = v;
        }
        if let Some(v) = patch.follow_up_date {
            lead.follow_up_date = Some(v);
        }
        if let Some(v) = patch.edition {
            lead.edition = Some(v);
        }
        if let Some(v) = patch.product_name {
            lead.product_name = Some(v);
        }
        for (k, v) in patch.custom_data {
            lead.custom_data.insert(k, v);
        }

        let updated = lead.clone();
        drop(leads);

        let key = dedup::normalize_url(&updated.website_url);
        self.store
            .history
            .write()
            .unwrap()
            .record(&key, updated.created_at);

        Ok(updated)
    }

    /// Write one field by its storage key, used by the debounced cell-commit
    /// path. Built-in fields are matched by canonical key; anything else
    /// lands in `custom_data`.
    pub fn set_field(&self, id: i64, field_key: &str, value: Value) -> Result<Lead, AppError> {
        let mut patch = LeadPatch::default();
        match field_key {
            "websiteUrl" => patch.website_url = Some(expect_string(field_key, value)?),
            "companyName" => patch.company_name = Some(expect_string(field_key, value)?),
            "contactName" => patch.contact_name = Some(expect_string(field_key, value)?),
            "email" => patch.email = Some(expect_string(field_key, value)?),
            "linkedinUrl" => patch.linkedin_url = Some(expect_string(field_key, value)?),
            "category" => patch.category = Some(expect_string(field_key, value)?),
            "teamSize" => patch.team_size = Some(expect_string(field_key, value)?),
            "fundingType" => patch.funding_type = Some(expect_string(field_key, value)?),
            "edition" => patch.edition = Some(expect_string(field_key, value)?),
            "productName" => patch.product_name = Some(expect_string(field_key, value)?),
            "arr" => {
                let n = value.as_f64().ok_or_else(|| {
                    AppError::invalid_field(field_key, "invalid_number", "Expected a number")
                })?;
                patch.arr = Some(n);
            }
            "status" => {
                let status: LeadStatus = serde_json::from_value(value).map_err(|_| {
                    AppError::invalid_field(field_key, "invalid_status", "Unknown lead status")
                })?;
                patch.status = Some(status);
            }
            "followUpDate" => {
                let raw = expect_string(field_key, value)?;
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    AppError::invalid_field(field_key, "invalid_date_format", "Expected YYYY-MM-DD")
                })?;
                patch.follow_up_date = Some(date);
            }
            custom => {
                patch.custom_data.insert(custom.to_string(), value);
            }
        }
        self.update(id, patch)
    }

    /// Hard delete. The URL stays in history on purpose: freshness checks
    /// must keep seeing it.
    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut leads = self.store.leads.write().unwrap();
        let before = leads.len();
        leads.retain(|l| l.id != id);
        if leads.len() == before {
            return Err(AppError::not_found("lead", id));
        }
        Ok(())
    }

    /// Delete a batch, continuing past individual failures and tallying
    /// both outcomes.
    pub fn bulk_delete(&self, ids: &[i64]) -> BulkDeleteReport {
        let mut deleted = 0;
        let mut failed_ids = Vec::new();
        for &id in ids {
            match self.delete(id) {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(id, error = %e, "bulk delete: skipping lead");
                    failed_ids.push(id);
                }
            }
        }
        BulkDeleteReport {
            deleted,
            failed: failed_ids.len(),
            failed_ids,
        }
    }

    /// Leads created on `as_of` whose URL has no earlier history, the
    /// "new today" number, excluding same-day re-entries of known URLs.
    pub fn fresh_leads(&self, as_of: NaiveDate) -> Vec<Lead> {
        let (leads, _) = self.list();
        let history = self.store.history.read().unwrap();
        leads
            .into_iter()
            .filter(|l| dedup::is_fresh_lead(l, as_of, &history))
            .collect()
    }
}

fn expect_string(field: &str, value: Value) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(AppError::invalid_field(
            field,
            "invalid_text",
            "Expected a string",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::Database;
    use serde_json::json;

    fn repo() -> LeadRepository {
        LeadRepository::new(Database::new())
    }

    fn new_lead(url: &str) -> NewLead {
        NewLead {
            website_url: url.to_string(),
            ..NewLead::default()
        }
    }

    #[test]
    fn create_fills_defaults_and_assigns_sequential_ids() {
        let repo = repo();
        let first = repo
            .create(NewLead {
                website_url: "https://acme.com".into(),
                company_name: Some("Acme".into()),
                ..NewLead::default()
            })
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.status, LeadStatus::NewLead);
        assert_eq!(first.team_size, "1-3");
        assert_eq!(first.funding_type, "Bootstrapped");

        let second = repo.create(new_lead("https://other.io")).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn create_rejects_blank_and_duplicate_urls() {
        let repo = repo();
        assert!(matches!(
            repo.create(new_lead("   ")),
            Err(AppError::Validation(_))
        ));

        repo.create(new_lead("https://acme.com")).unwrap();
        // Trailing-slash and case insensitive.
        assert!(matches!(
            repo.create(new_lead("https://ACME.com/")),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn deleted_url_can_be_recreated_but_is_not_fresh() {
        let repo = repo();
        let lead = repo.create(new_lead("https://acme.com")).unwrap();

        // Backdate the first sighting so the re-entry has earlier history.
        {
            let mut history = repo.store.history.write().unwrap();
            history.record(
                "https://acme.com",
                lead.created_at - chrono::Duration::days(3),
            );
        }
        repo.delete(lead.id).unwrap();

        let again = repo.create(new_lead("https://acme.com")).unwrap();
        let today = again.created_at.date_naive();
        let fresh = repo.fresh_leads(today);
        assert!(fresh.iter().all(|l| l.id != again.id));
    }

    #[test]
    fn list_repairs_duplicates_and_reports_them() {
        let repo = repo();
        let keeper = repo.create(new_lead("https://acme.com")).unwrap();
        // Sneak a duplicate into the backing store, as same-tick inserts or
        // migrated data would.
        {
            let mut leads = repo.store.leads.write().unwrap();
            let mut dup = keeper.clone();
            dup.id = 99;
            dup.website_url = "https://ACME.com/".into();
            dup.created_at -= chrono::Duration::hours(1);
            leads.push(dup);
        }

        let (active, report) = repo.list();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, keeper.id);
        let report = report.expect("a repair happened");
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.removed_ids, vec![99]);

        // Second read finds nothing left to repair.
        let (_, report) = repo.list();
        assert!(report.is_none());
    }

    #[test]
    fn update_revalidates_url_uniqueness() {
        let repo = repo();
        repo.create(new_lead("https://acme.com")).unwrap();
        let other = repo.create(new_lead("https://other.io")).unwrap();

        let patch = LeadPatch {
            website_url: Some("https://acme.com/".into()),
            ..LeadPatch::default()
        };
        assert!(matches!(
            repo.update(other.id, patch),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn update_merges_partials_and_keeps_created_at() {
        let repo = repo();
        let lead = repo.create(new_lead("https://acme.com")).unwrap();
        let updated = repo
            .update(
                lead.id,
                LeadPatch {
                    company_name: Some("Acme Inc".into()),
                    arr: Some(250_000.0),
                    ..LeadPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.company_name.as_deref(), Some("Acme Inc"));
        assert_eq!(updated.arr, Some(250_000.0));
        assert_eq!(updated.created_at, lead.created_at);
        assert_eq!(updated.website_url, lead.website_url);
    }

    #[test]
    fn set_field_routes_unknown_keys_to_custom_data() {
        let repo = repo();
        let lead = repo.create(new_lead("https://acme.com")).unwrap();

        let updated = repo.set_field(lead.id, "region", json!("EMEA")).unwrap();
        assert_eq!(updated.custom_data.get("region"), Some(&json!("EMEA")));

        let updated = repo.set_field(lead.id, "arr", json!(120000)).unwrap();
        assert_eq!(updated.arr, Some(120000.0));

        assert!(matches!(
            repo.set_field(lead.id, "arr", json!("not a number")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn bulk_delete_continues_past_stale_ids() {
        let repo = repo();
        let mut ids: Vec<i64> = (0..5)
            .map(|i| {
                repo.create(new_lead(&format!("https://co{i}.com")))
                    .unwrap()
                    .id
            })
            .collect();
        repo.delete(ids[2]).unwrap(); // make one id stale

        let report = repo.bulk_delete(&ids);
        assert_eq!(report.deleted, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_ids, vec![ids.remove(2)]);
        assert!(repo.list().0.is_empty());
    }
}
