// src/main.rs

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod docs;
mod handlers;
mod models;
mod services;
mod store;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() is right here: if configuration fails the app must not start.
    let app_state = AppState::new().expect("failed to initialize application state");

    let lead_routes = Router::new()
        .route(
            "/",
            post(handlers::leads::create_lead).get(handlers::leads::list_leads),
        )
        .route("/table", get(handlers::leads::query_leads))
        .route("/fresh", get(handlers::leads::fresh_leads))
        .route("/bulk-delete", post(handlers::leads::bulk_delete_leads))
        .route(
            "/{id}",
            get(handlers::leads::get_lead)
                .put(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/{id}/status", put(handlers::leads::set_lead_status))
        .route("/{id}/fields/{key}", patch(handlers::leads::commit_lead_field));

    let deal_routes = Router::new()
        .route(
            "/",
            post(handlers::deals::create_deal).get(handlers::deals::list_deals),
        )
        .route(
            "/{id}",
            get(handlers::deals::get_deal)
                .put(handlers::deals::update_deal)
                .delete(handlers::deals::delete_deal),
        )
        .route("/{id}/move", put(handlers::deals::move_deal));

    let column_routes = Router::new()
        .route(
            "/",
            post(handlers::columns::create_column).get(handlers::columns::list_columns),
        )
        .route("/reorder", put(handlers::columns::reorder_columns))
        .route("/order/changes", get(handlers::columns::watch_column_order))
        .route(
            "/{id}",
            put(handlers::columns::update_column).delete(handlers::columns::delete_column),
        );

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/pipeline/summary", get(handlers::deals::pipeline_summary))
        .nest("/api/leads", lead_routes)
        .nest("/api/deals", deal_routes)
        .nest("/api/columns", column_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr =
        std::env::var("LEADPIPE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!(
        "listening on {}",
        listener.local_addr().expect("listener has a local address")
    );
    axum::serve(listener, app).await.expect("axum server error");
}
