// src/models/lead.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::deal::DealStage;

/// Funnel position of a lead. Serialized with the display labels the
/// frontend renders in the status dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LeadStatus {
    #[serde(rename = "New Lead")]
    NewLead,
    #[serde(rename = "Contacted")]
    Contacted,
    #[serde(rename = "Follow Up")]
    FollowUp,
    #[serde(rename = "No Response")]
    NoResponse,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "Demo Scheduled")]
    DemoScheduled,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
    #[serde(rename = "Meeting Done")]
    MeetingDone,
    #[serde(rename = "Commercials Sent")]
    CommercialsSent,
    #[serde(rename = "Negotiation")]
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Nurture")]
    Nurture,
    #[serde(rename = "Disqualified")]
    Disqualified,
}

impl LeadStatus {
    /// Statuses that drive the deal lifecycle. Returns the pipeline stage a
    /// deal for this lead should move to (or be created in), or `None` when
    /// the status has no deal-side effect.
    ///
    /// `Closed Won` lands on the `Closed` stage: the board has no separate
    /// "Won" column.
    pub fn deal_stage_trigger(&self) -> Option<DealStage> {
        match self {
            LeadStatus::Contacted => Some(DealStage::Connected),
            LeadStatus::MeetingBooked => Some(DealStage::MeetingBooked),
            LeadStatus::MeetingDone => Some(DealStage::MeetingDone),
            LeadStatus::CommercialsSent => Some(DealStage::Negotiation),
            LeadStatus::Negotiation => Some(DealStage::Negotiation),
            LeadStatus::ClosedWon => Some(DealStage::Closed),
            LeadStatus::ClosedLost => Some(DealStage::Lost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,

    /// Dedup key. Compared after normalization (lowercase, one trailing
    /// slash stripped), stored as entered.
    #[schema(example = "https://acme.com")]
    pub website_url: String,

    #[schema(example = "Acme Inc")]
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub category: Option<String>,

    #[schema(example = "1-3")]
    pub team_size: String,
    #[schema(example = 120000.0)]
    pub arr: Option<f64>,
    pub status: LeadStatus,
    #[schema(example = "Bootstrapped")]
    pub funding_type: String,

    #[schema(value_type = Option<String>, format = Date, example = "2026-09-01")]
    pub follow_up_date: Option<NaiveDate>,

    pub edition: Option<String>,
    pub product_name: Option<String>,

    // Values for user-defined columns, keyed by the column's stored
    // field key (e.g. { "region": "EMEA" }).
    #[serde(default)]
    #[schema(value_type = Object)]
    pub custom_data: Map<String, Value>,

    pub created_at: DateTime<Utc>,
}

/// Input for lead creation. Everything except the website URL is optional;
/// the repository fills the documented defaults for omitted fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub website_url: String,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub category: Option<String>,
    pub team_size: Option<String>,
    pub arr: Option<f64>,
    pub status: Option<LeadStatus>,
    pub funding_type: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub product_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub custom_data: Map<String, Value>,
}

/// Result of a status change. The status itself always committed; `warning`
/// is set when the follow-on deal bookkeeping failed and was skipped.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub lead: Lead,
    pub warning: Option<String>,
}

/// Partial update. `None` means "leave the field as it is"; there is no way
/// to blank a field through this path, matching the edit-cell UI.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    pub website_url: Option<String>,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub category: Option<String>,
    pub team_size: Option<String>,
    pub arr: Option<f64>,
    pub status: Option<LeadStatus>,
    pub funding_type: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub product_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub custom_data: Map<String, Value>,
}
