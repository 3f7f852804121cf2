// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::query_leads,
        handlers::leads::fresh_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::set_lead_status,
        handlers::leads::commit_lead_field,
        handlers::leads::delete_lead,
        handlers::leads::bulk_delete_leads,

        // --- Deals ---
        handlers::deals::create_deal,
        handlers::deals::list_deals,
        handlers::deals::get_deal,
        handlers::deals::update_deal,
        handlers::deals::move_deal,
        handlers::deals::delete_deal,
        handlers::deals::pipeline_summary,

        // --- Columns ---
        handlers::columns::create_column,
        handlers::columns::list_columns,
        handlers::columns::update_column,
        handlers::columns::delete_column,
        handlers::columns::reorder_columns,
        handlers::columns::watch_column_order,
    ),
    components(
        schemas(
            // --- Leads ---
            models::lead::Lead,
            models::lead::LeadStatus,
            models::lead::NewLead,
            models::lead::LeadPatch,
            models::lead::StatusChange,
            models::view::SortDirection,
            models::view::LeadPage,
            models::view::DedupReport,
            models::view::BulkDeleteReport,
            handlers::leads::LeadListResponse,
            handlers::leads::SetStatusPayload,
            handlers::leads::FieldCommitPayload,
            handlers::leads::BulkDeletePayload,

            // --- Deals ---
            models::deal::Deal,
            models::deal::DealStage,
            models::deal::DealPatch,
            models::deal::StageSummary,
            handlers::deals::CreateDealPayload,
            handlers::deals::MoveDealPayload,

            // --- Columns ---
            models::column::CustomColumn,
            models::column::ColumnType,
            models::column::ConditionalRule,
            models::column::ColumnPatch,
            handlers::columns::CreateColumnPayload,
            handlers::columns::ReorderPayload,
        )
    ),
    tags(
        (name = "Leads", description = "Lead management and the table view"),
        (name = "Deals", description = "Pipeline board and stage transitions"),
        (name = "Columns", description = "Custom column schema")
    )
)]
pub struct ApiDoc;
