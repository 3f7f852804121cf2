// src/services/lead_service.rs

use chrono::NaiveDate;
use serde_json::Value;

use crate::common::debounce::Debouncer;
use crate::common::error::AppError;
use crate::models::deal::NewDeal;
use crate::models::lead::{Lead, LeadPatch, LeadStatus, NewLead, StatusChange};
use crate::models::view::{BulkDeleteReport, DedupReport, LeadPage, LeadQuery};
use crate::services::view_service;
use crate::store::{ColumnRepository, DealRepository, LeadRepository};

#[derive(Clone)]
pub struct LeadService {
    leads: LeadRepository,
    deals: DealRepository,
    columns: ColumnRepository,
    debouncer: Debouncer,
}

impl LeadService {
    pub fn new(
        leads: LeadRepository,
        deals: DealRepository,
        columns: ColumnRepository,
        debouncer: Debouncer,
    ) -> Self {
        Self {
            leads,
            deals,
            columns,
            debouncer,
        }
    }

    pub fn create(&self, input: NewLead) -> Result<Lead, AppError> {
        self.leads.create(input)
    }

    pub fn get(&self, id: i64) -> Result<Lead, AppError> {
        self.leads.get(id)
    }

    pub fn list(&self) -> (Vec<Lead>, Option<DedupReport>) {
        self.leads.list()
    }

    /// The table view: dedup-repaired collection run through the derived
    /// view pipeline against the active column schema.
    pub fn query(&self, query: &LeadQuery) -> LeadPage {
        let (leads, _) = self.leads.list();
        let columns = self.columns.list();
        view_service::compute(&leads, &columns, query)
    }

    pub fn update(&self, id: i64, patch: LeadPatch) -> Result<Lead, AppError> {
        self.leads.update(id, patch)
    }

    /// Delete a lead, dropping any cell edits still waiting out their
    /// debounce window so they cannot land on a later lead that reuses the
    /// id.
    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        self.leads.delete(id)?;
        self.debouncer.cancel_record(id);
        Ok(())
    }

    pub fn bulk_delete(&self, ids: &[i64]) -> BulkDeleteReport {
        let report = self.leads.bulk_delete(ids);
        for &id in ids {
            self.debouncer.cancel_record(id);
        }
        report
    }

    pub fn fresh_leads(&self, as_of: NaiveDate) -> Vec<Lead> {
        self.leads.fresh_leads(as_of)
    }

    /// Change a lead's status and keep the deal board in step. The status
    /// change is the primary intent and always commits first; deal
    /// bookkeeping is best effort: its failure is logged and reported as a
    /// warning, never rolled into a request failure.
    pub fn set_status(&self, id: i64, status: LeadStatus) -> Result<StatusChange, AppError> {
        let lead = self.leads.update(
            id,
            LeadPatch {
                status: Some(status),
                ..LeadPatch::default()
            },
        )?;

        let mut warning = None;
        if let Some(stage) = status.deal_stage_trigger() {
            if let Err(e) = self.sync_deal(&lead, status, stage) {
                tracing::warn!(lead_id = id, error = %e, "deal sync after status change failed");
                warning = Some(
                    "Lead status was saved, but the deal board could not be updated".to_string(),
                );
            }
        }

        Ok(StatusChange { lead, warning })
    }

    fn sync_deal(
        &self,
        lead: &Lead,
        status: LeadStatus,
        stage: crate::models::deal::DealStage,
    ) -> Result<(), AppError> {
        if let Some(deal) = self.deals.find_by_lead(lead.id) {
            self.deals.set_stage(&deal.id, stage)?;
            return Ok(());
        }
        // A lost lead with no deal on the board gets none created for it.
        if status == LeadStatus::ClosedLost {
            return Ok(());
        }
        self.deals.create(NewDeal {
            title: lead
                .company_name
                .clone()
                .unwrap_or_else(|| lead.website_url.clone()),
            value: lead.arr,
            stage: Some(stage),
            lead_id: Some(lead.id),
            assigned_rep: lead.contact_name.clone(),
        })?;
        Ok(())
    }

    /// Debounced single-cell commit: the value is persisted only if no newer
    /// edit for the same `(lead, field)` arrives within the window. Commit
    /// failures after the window are logged; the user already moved on.
    pub fn commit_field_debounced(&self, id: i64, field_key: &str, value: Value) {
        let repo = self.leads.clone();
        let key = field_key.to_string();
        self.debouncer.schedule(id, field_key, move || async move {
            if let Err(e) = repo.set_field(id, &key, value) {
                tracing::warn!(lead_id = id, field = %key, error = %e, "debounced field commit failed");
            }
        });
    }
}
