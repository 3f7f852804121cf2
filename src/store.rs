pub mod memory;
pub use memory::{Database, Store};
pub mod history;
pub use history::HistoryTracker;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod deal_repo;
pub use deal_repo::DealRepository;
pub mod column_repo;
pub use column_repo::ColumnRepository;
pub mod order_file;
pub use order_file::ColumnOrderStore;
