//! Order Request API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order-requests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/next-statuses", get(handler::next_statuses))
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/confirm-waiting", post(handler::confirm_waiting))
        .route("/{id}/waiting", post(handler::set_waiting))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/convert", post(handler::convert))
}
