pub mod column;
pub mod deal;
pub mod lead;
pub mod view;
