// src/config.rs

use std::{env, path::PathBuf};

use crate::common::debounce::Debouncer;
use crate::services::{ColumnService, DealService, LeadService};
use crate::store::{
    ColumnOrderStore, ColumnRepository, Database, DealRepository, LeadRepository,
};

// Shared state, accessible from every handler.
#[derive(Clone)]
pub struct AppState {
    pub lead_service: LeadService,
    pub deal_service: DealService,
    pub column_service: ColumnService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir = PathBuf::from(
            env::var("LEADPIPE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        );
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("data directory: {}", data_dir.display());

        // Assemble the dependency graph: one store, injected everywhere.
        let db = Database::new();
        let lead_repo = LeadRepository::new(db.clone());
        let deal_repo = DealRepository::new(db.clone());
        let column_repo = ColumnRepository::new(db);

        let order_store = ColumnOrderStore::new(&data_dir);
        let column_service = ColumnService::new(column_repo.clone(), order_store);
        let deal_service = DealService::new(deal_repo.clone());
        let lead_service = LeadService::new(
            lead_repo,
            deal_repo,
            column_repo,
            Debouncer::default(),
        );

        Ok(Self {
            lead_service,
            deal_service,
            column_service,
        })
    }
}
