//! Shared helpers for integration tests

#![allow(dead_code)]

use backoffice_server::db::models::{
    CartItem, OrderRequestCreate, ReasonCreate, ReasonType, SelectedAddon,
};
use backoffice_server::db::repository::ReasonRepository;
use backoffice_server::{Config, LifecycleController, ServerState};
use shared::lifecycle::OrderType;

pub const RESTAURANT: &str = "test-restaurant";

pub async fn test_state() -> ServerState {
    let mut config = Config::default();
    config.restaurant_id = RESTAURANT.to_string();
    ServerState::initialize_in_memory(&config)
        .await
        .expect("in-memory state")
}

pub async fn controller() -> (ServerState, LifecycleController) {
    let state = test_state().await;
    let controller = LifecycleController::new(state.clone());
    (state, controller)
}

/// Insert a reason and return its record id string ("reason:xyz")
pub async fn seed_reason(state: &ServerState, reason_type: ReasonType, text: &str) -> String {
    let repo = ReasonRepository::new(state.get_db(), state.restaurant_id());
    let reason = repo
        .create(ReasonCreate {
            reason_type,
            text: text.to_string(),
        })
        .await
        .expect("seed reason");
    reason.id.expect("reason id").to_string()
}

pub fn cart() -> Vec<CartItem> {
    vec![
        CartItem {
            product_id: "product:noodles".into(),
            name: "Dan Dan Noodles".into(),
            quantity: 2,
            unit_price: 9.0,
            selected_attribute: None,
            customizations: vec![],
            addons: vec![SelectedAddon {
                addon_id: "addon:egg".into(),
                name: "Extra egg".into(),
                price: 1.5,
                quantity: 1,
            }],
            line_total: 0.0,
        },
        CartItem {
            product_id: "product:tea".into(),
            name: "Jasmine Tea".into(),
            quantity: 1,
            unit_price: 3.0,
            selected_attribute: None,
            customizations: vec![],
            addons: vec![],
            line_total: 0.0,
        },
    ]
}

pub fn request_payload(order_type: OrderType) -> OrderRequestCreate {
    OrderRequestCreate {
        user_id: "user:guest-42".into(),
        order_type,
        items: cart(),
    }
}
