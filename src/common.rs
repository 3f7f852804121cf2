pub mod debounce;
pub mod error;

pub use error::AppError;
