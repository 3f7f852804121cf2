// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    models::lead::{Lead, LeadPatch, LeadStatus, NewLead, StatusChange},
    models::view::{BulkDeleteReport, DedupReport, LeadPage, LeadQuery},
};

/// List response: the active set plus the dedup report when the read-time
/// repair pass removed anything.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
    pub dedup_report: Option<DedupReport>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusPayload {
    #[schema(example = "Meeting Booked")]
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldCommitPayload {
    #[schema(example = json!("Acme Inc"))]
    pub value: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeletePayload {
    #[schema(example = json!([1, 2, 3, 4, 5]))]
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FreshQuery {
    /// Calendar day to evaluate, defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = NewLead,
    responses(
        (status = 201, description = "Lead created", body = Lead),
        (status = 400, description = "Website URL missing"),
        (status = 409, description = "A lead with this website already exists")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<NewLead>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.create(payload)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Active leads after the dedup pass", body = LeadListResponse)
    )
)]
pub async fn list_leads(State(app_state): State<AppState>) -> impl IntoResponse {
    let (leads, dedup_report) = app_state.lead_service.list();
    Json(LeadListResponse { leads, dedup_report })
}

// GET /api/leads/table
#[utoipa::path(
    get,
    path = "/api/leads/table",
    tag = "Leads",
    params(LeadQuery),
    responses(
        (status = 200, description = "One filtered, sorted, paginated table page", body = LeadPage)
    )
)]
pub async fn query_leads(
    State(app_state): State<AppState>,
    Query(query): Query<LeadQuery>,
) -> impl IntoResponse {
    Json(app_state.lead_service.query(&query))
}

// GET /api/leads/fresh
#[utoipa::path(
    get,
    path = "/api/leads/fresh",
    tag = "Leads",
    params(FreshQuery),
    responses(
        (status = 200, description = "Leads created that day with no earlier URL history", body = Vec<Lead>)
    )
)]
pub async fn fresh_leads(
    State(app_state): State<AppState>,
    Query(query): Query<FreshQuery>,
) -> impl IntoResponse {
    let as_of = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Json(app_state.lead_service.fresh_leads(as_of))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 200, description = "The lead", body = Lead),
        (status = 404, description = "Unknown lead")
    )
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.lead_service.get(id)?))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = LeadPatch,
    responses(
        (status = 200, description = "Lead updated", body = Lead),
        (status = 404, description = "Unknown lead"),
        (status = 409, description = "Website URL already in use")
    )
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<LeadPatch>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.lead_service.update(id, patch)?))
}

// PUT /api/leads/{id}/status
#[utoipa::path(
    put,
    path = "/api/leads/{id}/status",
    tag = "Leads",
    request_body = SetStatusPayload,
    responses(
        (status = 200, description = "Status saved; warning set if deal sync failed", body = StatusChange),
        (status = 404, description = "Unknown lead")
    )
)]
pub async fn set_lead_status(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.lead_service.set_status(id, payload.status)?))
}

// PATCH /api/leads/{id}/fields/{key}
#[utoipa::path(
    patch,
    path = "/api/leads/{id}/fields/{key}",
    tag = "Leads",
    request_body = FieldCommitPayload,
    responses(
        (status = 202, description = "Commit scheduled; a newer edit within the debounce window supersedes it")
    )
)]
pub async fn commit_lead_field(
    State(app_state): State<AppState>,
    Path((id, key)): Path<(i64, String)>,
    Json(payload): Json<FieldCommitPayload>,
) -> impl IntoResponse {
    app_state
        .lead_service
        .commit_field_debounced(id, &key, payload.value);
    StatusCode::ACCEPTED
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 204, description = "Lead deleted; its URL stays in history"),
        (status = 404, description = "Unknown lead")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/leads/bulk-delete
#[utoipa::path(
    post,
    path = "/api/leads/bulk-delete",
    tag = "Leads",
    request_body = BulkDeletePayload,
    responses(
        (status = 200, description = "Per-item tallies; failures do not abort the batch", body = BulkDeleteReport)
    )
)]
pub async fn bulk_delete_leads(
    State(app_state): State<AppState>,
    Json(payload): Json<BulkDeletePayload>,
) -> impl IntoResponse {
    Json(app_state.lead_service.bulk_delete(&payload.ids))
}
