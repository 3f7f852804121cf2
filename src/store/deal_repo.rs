// src/store/deal_repo.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::common::error::AppError;
use crate::models::deal::{Deal, DealPatch, DealStage, NewDeal};
use crate::store::memory::Store;

#[derive(Clone)]
pub struct DealRepository {
    store: Store,
    // Disambiguates ids minted within the same millisecond.
    seq: Arc<AtomicU64>,
}

impl DealRepository {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    // Deals are never deduplicated, so a clock token is enough identity.
    fn next_id(&self) -> String {
        format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            self.seq.fetch_add(1, Ordering::Relaxed)
        )
    }

    pub fn create(&self, input: NewDeal) -> Result<Deal, AppError> {
        if input.title.trim().is_empty() {
            return Err(AppError::invalid_field(
                "title",
                "required",
                "Deal title is required",
            ));
        }
        let now = Utc::now();
        let deal = Deal {
            id: self.next_id(),
            title: input.title,
            value: input.value.unwrap_or(0.0),
            stage: input.stage.unwrap_or(DealStage::Connected),
            lead_id: input.lead_id,
            assigned_rep: input.assigned_rep,
            created_at: now,
            updated_at: now,
        };
        self.store.deals.write().unwrap().push(deal.clone());
        Ok(deal)
    }

    pub fn get(&self, id: &str) -> Result<Deal, AppError> {
        self.store
            .deals
            .read()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("deal", id))
    }

    pub fn list(&self) -> Vec<Deal> {
        self.store.deals.read().unwrap().clone()
    }

    /// First deal referencing the lead, if any. The "one active deal per
    /// lead" rule is best effort; whichever deal was created first wins.
    pub fn find_by_lead(&self, lead_id: i64) -> Option<Deal> {
        self.store
            .deals
            .read()
            .unwrap()
            .iter()
            .find(|d| d.lead_id == Some(lead_id))
            .cloned()
    }

    pub fn update(&self, id: &str, patch: DealPatch) -> Result<Deal, AppError> {
        let mut deals = self.store.deals.write().unwrap();
        let deal = deals
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("deal", id))?;

        if let Some(v) = patch.title {
            deal.title = v;
        }
        if let Some(v) = patch.value {
            deal.value = v;
        }
        if let Some(v) = patch.stage {
            deal.stage = v;
        }
        if let Some(v) = patch.assigned_rep {
            deal.assigned_rep = Some(v);
        }
        deal.updated_at = Utc::now();
        Ok(deal.clone())
    }

    /// Move a deal to a stage. Atomic under the store lock: a stale id
    /// changes nothing and returns NotFound.
    pub fn set_stage(&self, id: &str, stage: DealStage) -> Result<Deal, AppError> {
        self.update(
            id,
            DealPatch {
                stage: Some(stage),
                ..DealPatch::default()
            },
        )
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut deals = self.store.deals.write().unwrap();
        let before = deals.len();
        deals.retain(|d| d.id != id);
        if deals.len() == before {
            return Err(AppError::not_found("deal", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::Database;

    fn repo() -> DealRepository {
        DealRepository::new(Database::new())
    }

    #[test]
    fn create_defaults_and_unique_ids() {
        let repo = repo();
        let a = repo
            .create(NewDeal {
                title: "Acme".into(),
                ..NewDeal::default()
            })
            .unwrap();
        let b = repo
            .create(NewDeal {
                title: "Globex".into(),
                ..NewDeal::default()
            })
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.stage, DealStage::Connected);
        assert_eq!(a.value, 0.0);
    }

    #[test]
    fn set_stage_touches_updated_at_and_rejects_stale_ids() {
        let repo = repo();
        let deal = repo
            .create(NewDeal {
                title: "Acme".into(),
                ..NewDeal::default()
            })
            .unwrap();

        let moved = repo.set_stage(&deal.id, DealStage::Negotiation).unwrap();
        assert_eq!(moved.stage, DealStage::Negotiation);
        assert!(moved.updated_at >= deal.updated_at);

        assert!(matches!(
            repo.set_stage("0-0", DealStage::Lost),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn find_by_lead_returns_first_match() {
        let repo = repo();
        repo.create(NewDeal {
            title: "Acme".into(),
            lead_id: Some(7),
            ..NewDeal::default()
        })
        .unwrap();
        assert!(repo.find_by_lead(7).is_some());
        assert!(repo.find_by_lead(8).is_none());
    }
}
