//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate};
use crate::lifecycle::LifecycleController;
use crate::utils::{ApiResponse, AppResult};
use shared::lifecycle::OrderStatus;
use shared::response::PaginatedResponse;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReasonPayload {
    pub reason_id: Option<String>,
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<Order>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page as i64 - 1) * per_page as i64;

    let controller = LifecycleController::new(state);
    let (items, total) = controller
        .list_orders(query.status, per_page as i64, offset)
        .await?;
    Ok(ApiResponse::success(PaginatedResponse::new(
        items,
        page,
        per_page,
        total as u64,
    )))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.create_order(payload).await?;
    Ok(ApiResponse::success(order))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.get_order(&id).await?;
    Ok(ApiResponse::success(order))
}

/// GET /api/orders/by-number/:number
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.get_order_by_number(&number).await?;
    Ok(ApiResponse::success(order))
}

/// GET /api/orders/:id/next-statuses
pub async fn next_statuses(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<OrderStatus>>> {
    let controller = LifecycleController::new(state);
    let statuses = controller.order_next_statuses(&id).await?;
    Ok(ApiResponse::success(statuses))
}

/// POST /api/orders/:id/confirm
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.confirm_order(&id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/:id/preparing
pub async fn preparing(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.start_preparing(&id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/:id/ready
pub async fn ready(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.mark_ready(&id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/:id/served
pub async fn served(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.mark_served(&id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/:id/completed
pub async fn completed(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.complete_order(&id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReasonPayload>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.cancel_order(&id, payload.reason_id).await?;
    Ok(ApiResponse::success(order))
}
