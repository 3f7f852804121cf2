// src/handlers/columns.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::column::{ColumnPatch, ColumnType, ConditionalRule, CustomColumn},
    store::column_repo::NewColumn,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Region")]
    pub name: String,

    #[schema(example = "select")]
    pub column_type: ColumnType,

    #[serde(default)]
    pub required: bool,

    pub default_value: Option<Value>,

    #[serde(default)]
    #[schema(example = json!(["EMEA", "AMER", "APAC"]))]
    pub select_options: Vec<String>,

    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPayload {
    /// Column ids in the desired display order. Columns not listed keep
    /// their relative order after the listed ones.
    #[schema(example = json!([3, 1, 2]))]
    pub ids: Vec<i64>,
}

// POST /api/columns
#[utoipa::path(
    post,
    path = "/api/columns",
    tag = "Columns",
    request_body = CreateColumnPayload,
    responses(
        (status = 201, description = "Column created", body = CustomColumn),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Column name already in use")
    )
)]
pub async fn create_column(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateColumnPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let column = app_state.column_service.create(NewColumn {
        name: payload.name,
        column_type: payload.column_type,
        required: payload.required,
        default_value: payload.default_value,
        select_options: payload.select_options,
        conditional_rules: payload.conditional_rules,
    })?;

    Ok((StatusCode::CREATED, Json(column)))
}

// GET /api/columns
#[utoipa::path(
    get,
    path = "/api/columns",
    tag = "Columns",
    responses(
        (status = 200, description = "Columns in display order", body = Vec<CustomColumn>)
    )
)]
pub async fn list_columns(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.column_service.list())
}

// PUT /api/columns/{id}
#[utoipa::path(
    put,
    path = "/api/columns/{id}",
    tag = "Columns",
    request_body = ColumnPatch,
    responses(
        (status = 200, description = "Column updated", body = CustomColumn),
        (status = 403, description = "Default column cannot change type"),
        (status = 404, description = "Unknown column"),
        (status = 409, description = "Column name already in use")
    )
)]
pub async fn update_column(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ColumnPatch>,
) -> Result<impl IntoResponse, AppError> {
    let column = app_state.column_service.update(id, patch)?;
    Ok(Json(column))
}

// DELETE /api/columns/{id}
#[utoipa::path(
    delete,
    path = "/api/columns/{id}",
    tag = "Columns",
    responses(
        (status = 204, description = "Column deleted"),
        (status = 403, description = "Default columns cannot be deleted"),
        (status = 404, description = "Unknown column")
    )
)]
pub async fn delete_column(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.column_service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/columns/order/changes
#[utoipa::path(
    get,
    path = "/api/columns/order/changes",
    tag = "Columns",
    responses(
        (status = 200, description = "Column ids in the newly saved display order", body = Vec<i64>)
    )
)]
pub async fn watch_column_order(State(app_state): State<AppState>) -> impl IntoResponse {
    // Long poll: the request parks until another client saves a reorder,
    // letting open table views pick up the shared order without a reload.
    Json(app_state.column_service.next_order_change().await)
}

// PUT /api/columns/reorder
#[utoipa::path(
    put,
    path = "/api/columns/reorder",
    tag = "Columns",
    request_body = ReorderPayload,
    responses(
        (status = 200, description = "Columns in the new display order", body = Vec<CustomColumn>)
    )
)]
pub async fn reorder_columns(
    State(app_state): State<AppState>,
    Json(payload): Json<ReorderPayload>,
) -> impl IntoResponse {
    Json(app_state.column_service.reorder(&payload.ids))
}
