//! Database Models

// Serde helpers
pub mod serde_helpers;

// Lifecycle entities
pub mod order;
pub mod order_request;

// Reason catalog
pub mod reason;

// Re-exports
pub use order::{Order, OrderCreate, PaymentMethod};
pub use order_request::{
    CartItem, OrderRequest, OrderRequestCreate, SelectedAddon, SelectedAttribute, SelectedOption,
};
pub use reason::{Reason, ReasonCreate, ReasonType, ReasonUpdate};
