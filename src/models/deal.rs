// src/models/deal.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pipeline board column a deal currently sits in. The order here is the
/// board's display order only; nothing enforces forward-only movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DealStage {
    #[serde(rename = "Connected")]
    Connected,
    #[serde(rename = "Locked")]
    Locked,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
    #[serde(rename = "Meeting Done")]
    MeetingDone,
    #[serde(rename = "Negotiation")]
    Negotiation,
    #[serde(rename = "Closed")]
    Closed,
    #[serde(rename = "Lost")]
    Lost,
}

impl DealStage {
    /// Every stage in board display order.
    pub const ALL: [DealStage; 7] = [
        DealStage::Connected,
        DealStage::Locked,
        DealStage::MeetingBooked,
        DealStage::MeetingDone,
        DealStage::Negotiation,
        DealStage::Closed,
        DealStage::Lost,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    /// Clock-token id ("<unix millis>-<seq>"). Deals are never deduplicated,
    /// so they do not need the dense integer ids leads get.
    #[schema(example = "1756080000000-3")]
    pub id: String,
    #[schema(example = "Acme Inc")]
    pub title: String,
    #[schema(example = 120000.0)]
    pub value: f64,
    pub stage: DealStage,
    /// Back-reference to the originating lead, when there is one.
    pub lead_id: Option<i64>,
    pub assigned_rep: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub title: String,
    pub value: Option<f64>,
    pub stage: Option<DealStage>,
    pub lead_id: Option<i64>,
    pub assigned_rep: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealPatch {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<DealStage>,
    pub assigned_rep: Option<String>,
}

/// Per-stage rollup shown in the board header: how many deals sit in the
/// stage and what they are worth together.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub stage: DealStage,
    #[schema(example = 4)]
    pub deal_count: usize,
    #[schema(example = 480000.0)]
    pub total_value: f64,
}
