//! Unified error handling
//!
//! The concrete types live in `shared::error` so that API consumers can
//! deserialize responses with the same definitions the server uses. This
//! module only re-exports them under the server's `utils` namespace.

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
