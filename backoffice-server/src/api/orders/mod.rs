//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/by-number/{number}", get(handler::get_by_number))
        .route("/{id}/next-statuses", get(handler::next_statuses))
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/preparing", post(handler::preparing))
        .route("/{id}/ready", post(handler::ready))
        .route("/{id}/served", post(handler::served))
        .route("/{id}/completed", post(handler::completed))
        .route("/{id}/cancel", post(handler::cancel))
}
