// src/handlers/deals.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::deal::{Deal, DealPatch, DealStage, NewDeal, StageSummary},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Acme Inc")]
    pub title: String,
    #[schema(example = 120000.0)]
    pub value: Option<f64>,
    pub stage: Option<DealStage>,
    pub lead_id: Option<i64>,
    pub assigned_rep: Option<String>,
}

/// A completed drag-and-drop. The destination index only matters for
/// rendering order inside a column, which is not stored; a same-stage drop
/// is therefore always a no-op.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveDealPayload {
    pub source_stage: DealStage,
    pub destination_stage: DealStage,
    pub destination_index: Option<usize>,
}

// POST /api/deals
#[utoipa::path(
    post,
    path = "/api/deals",
    tag = "Deals",
    request_body = CreateDealPayload,
    responses(
        (status = 201, description = "Deal created", body = Deal),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_deal(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDealPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let deal = app_state.deal_service.create(NewDeal {
        title: payload.title,
        value: payload.value,
        stage: payload.stage,
        lead_id: payload.lead_id,
        assigned_rep: payload.assigned_rep,
    })?;

    Ok((StatusCode::CREATED, Json(deal)))
}

// GET /api/deals
#[utoipa::path(
    get,
    path = "/api/deals",
    tag = "Deals",
    responses(
        (status = 200, description = "All deals", body = Vec<Deal>)
    )
)]
pub async fn list_deals(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.deal_service.list())
}

// GET /api/deals/{id}
#[utoipa::path(
    get,
    path = "/api/deals/{id}",
    tag = "Deals",
    responses(
        (status = 200, description = "The deal", body = Deal),
        (status = 404, description = "Unknown deal")
    )
)]
pub async fn get_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.deal_service.get(&id)?))
}

// PUT /api/deals/{id}
#[utoipa::path(
    put,
    path = "/api/deals/{id}",
    tag = "Deals",
    request_body = DealPatch,
    responses(
        (status = 200, description = "Deal updated", body = Deal),
        (status = 404, description = "Unknown deal")
    )
)]
pub async fn update_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<DealPatch>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.deal_service.update(&id, patch)?))
}

// PUT /api/deals/{id}/move
#[utoipa::path(
    put,
    path = "/api/deals/{id}/move",
    tag = "Deals",
    request_body = MoveDealPayload,
    responses(
        (status = 200, description = "Deal after the move (unchanged for same-stage drops)", body = Deal),
        (status = 404, description = "Unknown deal; the board is unchanged")
    )
)]
pub async fn move_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MoveDealPayload>,
) -> Result<impl IntoResponse, AppError> {
    let deal = app_state.deal_service.move_deal(
        &id,
        payload.source_stage,
        payload.destination_stage,
    )?;
    Ok(Json(deal))
}

// DELETE /api/deals/{id}
#[utoipa::path(
    delete,
    path = "/api/deals/{id}",
    tag = "Deals",
    responses(
        (status = 204, description = "Deal deleted"),
        (status = 404, description = "Unknown deal")
    )
)]
pub async fn delete_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.deal_service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/pipeline/summary
#[utoipa::path(
    get,
    path = "/api/pipeline/summary",
    tag = "Deals",
    responses(
        (status = 200, description = "Deal count and value sum per stage, board order", body = Vec<StageSummary>)
    )
)]
pub async fn pipeline_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.deal_service.board_summary())
}
