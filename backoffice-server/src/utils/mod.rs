//! Utility Module
//!
//! Logging setup plus re-exports of the unified error types from `shared`.

pub mod error;
pub mod logger;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
