//! Reason Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Reason, ReasonCreate, ReasonType, ReasonUpdate};
use crate::db::repository::ReasonRepository;
use crate::db::repository::RepoError;
use crate::lifecycle::controller::map_repo_err;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn map_reason_err(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ReasonTextExists, msg),
        RepoError::NotFound(msg) => {
            AppError::with_message(ErrorCode::ReasonNotFound, msg)
        }
        other => map_repo_err(other),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub reason_type: Option<ReasonType>,
}

fn repo(state: &ServerState) -> ReasonRepository {
    ReasonRepository::new(state.get_db(), state.restaurant_id())
}

/// GET /api/reasons
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Reason>>> {
    let reasons = repo(&state)
        .find_all(query.reason_type)
        .await
        .map_err(map_reason_err)?;
    Ok(ApiResponse::success(reasons))
}

/// GET /api/reasons/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Reason>> {
    let reason = repo(&state)
        .find_by_id(&id)
        .await
        .map_err(map_reason_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ReasonNotFound).with_detail("id", id))?;
    Ok(ApiResponse::success(reason))
}

/// POST /api/reasons
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReasonCreate>,
) -> AppResult<ApiResponse<Reason>> {
    let reason = repo(&state).create(payload).await.map_err(map_reason_err)?;
    Ok(ApiResponse::success(reason))
}

/// PUT /api/reasons/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReasonUpdate>,
) -> AppResult<ApiResponse<Reason>> {
    let reason = repo(&state)
        .update(&id, payload)
        .await
        .map_err(map_reason_err)?;
    Ok(ApiResponse::success(reason))
}

/// DELETE /api/reasons/:id - soft-deactivate
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Reason>> {
    let reason = repo(&state).deactivate(&id).await.map_err(map_reason_err)?;
    Ok(ApiResponse::success(reason))
}
