//! Order Request API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderRequest, OrderRequestCreate};
use crate::lifecycle::LifecycleController;
use crate::utils::{ApiResponse, AppResult};
use shared::lifecycle::OrderRequestStatus;
use shared::response::PaginatedResponse;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderRequestStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WaitingPayload {
    pub reason_id: Option<String>,
    pub waiting_time: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReasonPayload {
    pub reason_id: Option<String>,
}

/// GET /api/order-requests
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<OrderRequest>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page as i64 - 1) * per_page as i64;

    let controller = LifecycleController::new(state);
    let (items, total) = controller
        .list_requests(query.status, per_page as i64, offset)
        .await?;
    Ok(ApiResponse::success(PaginatedResponse::new(
        items,
        page,
        per_page,
        total as u64,
    )))
}

/// POST /api/order-requests
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderRequestCreate>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller.create_request(payload).await?;
    Ok(ApiResponse::success(request))
}

/// GET /api/order-requests/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller.get_request(&id).await?;
    Ok(ApiResponse::success(request))
}

/// GET /api/order-requests/:id/next-statuses
pub async fn next_statuses(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<OrderRequestStatus>>> {
    let controller = LifecycleController::new(state);
    let statuses = controller.request_next_statuses(&id).await?;
    Ok(ApiResponse::success(statuses))
}

/// POST /api/order-requests/:id/confirm
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller.confirm_request(&id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/order-requests/:id/confirm-waiting
pub async fn confirm_waiting(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller.confirm_waiting_request(&id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/order-requests/:id/waiting
pub async fn set_waiting(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WaitingPayload>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller
        .set_waiting(&id, payload.reason_id, payload.waiting_time)
        .await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/order-requests/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReasonPayload>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller.reject_request(&id, payload.reason_id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/order-requests/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReasonPayload>,
) -> AppResult<ApiResponse<OrderRequest>> {
    let controller = LifecycleController::new(state);
    let request = controller.cancel_request(&id, payload.reason_id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/order-requests/:id/convert
pub async fn convert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let controller = LifecycleController::new(state);
    let order = controller.convert_request(&id).await?;
    Ok(ApiResponse::success(order))
}
