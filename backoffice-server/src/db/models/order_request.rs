//! Order Request Model
//!
//! A customer's submitted cart awaiting restaurant approval. Requests are
//! never deleted; every status change goes through the guarded transition
//! operations, leaving an audit trail (`status_updated_by`, `cancelled_by`,
//! `reason`).

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::lifecycle::{OrderRequestStatus, OrderType};
use surrealdb::RecordId;

/// Attribute choice snapshot on a cart item (e.g. size)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedAttribute {
    pub attribute_id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

/// Customization choice snapshot (e.g. "no onions", "extra spicy")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOption {
    pub option_id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

/// Addon snapshot with its own quantity (e.g. extra sauce x2)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedAddon {
    pub addon_id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    pub quantity: i32,
}

/// Cart item snapshot - prices are captured at submission time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_attribute: Option<SelectedAttribute>,
    #[serde(default)]
    pub customizations: Vec<SelectedOption>,
    #[serde(default)]
    pub addons: Vec<SelectedAddon>,
    /// Computed: (unit_price + attribute + customizations) * quantity,
    /// plus addons (addons carry their own quantities)
    pub line_total: f64,
}

impl CartItem {
    /// Recompute the line total from the captured prices
    pub fn computed_line_total(&self) -> f64 {
        let attribute: f64 = self.selected_attribute.as_ref().map_or(0.0, |a| a.price);
        let customizations: f64 = self.customizations.iter().map(|c| c.price).sum();
        let addons: f64 = self
            .addons
            .iter()
            .map(|a| a.price * a.quantity as f64)
            .sum();
        (self.unit_price + attribute + customizations) * self.quantity as f64 + addons
    }
}

/// Order request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning restaurant; every query is scoped to it
    pub restaurant: String,
    /// Requesting customer reference
    pub user_id: String,
    pub order_type: OrderType,
    pub items: Vec<CartItem>,
    pub cart_total: f64,
    pub status: OrderRequestStatus,
    /// Announced waiting time in minutes (set by the WAITING transition)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_time: Option<i64>,
    /// Reason attached by the waiting/reject/cancel transitions
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub reason: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    /// Order number allocated when the request was converted; doubles as
    /// the compare-and-swap marker making conversion exactly-once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_order_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Creation payload for an order request
///
/// `cart_total` and per-item `line_total` are computed server-side from the
/// submitted snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequestCreate {
    pub user_id: String,
    pub order_type: OrderType,
    pub items: Vec<CartItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CartItem {
        CartItem {
            product_id: "product:burger".into(),
            name: "Burger".into(),
            quantity: 2,
            unit_price: 8.5,
            selected_attribute: Some(SelectedAttribute {
                attribute_id: "attribute:size".into(),
                name: "Large".into(),
                price: 1.5,
            }),
            customizations: vec![SelectedOption {
                option_id: "option:cheese".into(),
                name: "Extra cheese".into(),
                price: 0.5,
            }],
            addons: vec![SelectedAddon {
                addon_id: "addon:fries".into(),
                name: "Fries".into(),
                price: 3.0,
                quantity: 1,
            }],
            line_total: 0.0,
        }
    }

    #[test]
    fn test_line_total() {
        // (8.5 + 1.5 + 0.5) * 2 + 3.0
        assert!((item().computed_line_total() - 24.0).abs() < f64::EPSILON);
    }
}
