pub mod dedup;
pub mod column_service;
pub use column_service::ColumnService;
pub mod lead_service;
pub use lead_service::LeadService;
pub mod deal_service;
pub use deal_service::DealService;
pub mod view_service;
