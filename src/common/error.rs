// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Application-wide error type. Repositories and services return these;
// handlers let axum render them through `IntoResponse`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),

    // Conflicts carry a user-facing description (duplicate URL, duplicate
    // column name); a bare 409 is useless in a toast.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    // Anything unexpected. The detail is logged; the client gets a generic
    // message. Raw internals never reach the UI.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{entity} {id} does not exist"))
    }

    /// Build a single-field validation error outside of derive-based
    /// validation (e.g. checks that need repository state).
    pub fn invalid_field(field: &str, code: &'static str, message: &str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut field_error = validator::ValidationError::new(code);
        field_error.message = Some(message.to_string().into());
        // Leak is fine: field names come from a small fixed set.
        let static_field: &'static str = Box::leak(field.to_string().into_boxed_str());
        errors.add(static_field, field_error);
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every field-level detail so the form can highlight the
            // offending inputs.
            AppError::Validation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Internal(ref e) => {
                tracing::error!("internal server error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
