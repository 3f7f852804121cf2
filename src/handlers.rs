pub mod columns;
pub mod deals;
pub mod leads;
