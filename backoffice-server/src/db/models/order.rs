//! Order Model
//!
//! A confirmed order under fulfilment. Orders are created either directly or
//! by converting a confirmed order request; the conversion copies the cart
//! snapshot and allocates a unique `order_number`.

use super::order_request::CartItem;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::lifecycle::{OrderStatus, OrderType};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning restaurant; every query is scoped to it
    pub restaurant: String,
    /// Human-facing unique identifier (snowflake-derived)
    pub order_number: String,
    pub user_id: String,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    /// Reason attached by the cancel transition
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub reason: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Creation payload for a directly-placed order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub user_id: String,
    pub order_type: OrderType,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub items: Vec<CartItem>,
}
