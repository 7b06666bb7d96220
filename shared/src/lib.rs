//! Shared types for the back-office framework
//!
//! Common types used across crates: the unified error system, API response
//! structures, and the order lifecycle domain (statuses, transitions,
//! status-changed events).

pub mod error;
pub mod lifecycle;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Error system re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Lifecycle re-exports
pub use lifecycle::{
    LifecycleEntity, OrderRequestStatus, OrderStatus, OrderType, StatusChangedEvent,
};
