//! Lifecycle Controller
//!
//! Every transition is a guarded database update followed by one
//! status-changed event. The guard carries the full precondition, so the
//! controller never reads-then-writes: a stale read cannot slip a bad
//! transition through.

use crate::core::ServerState;
use crate::db::models::{
    Order, OrderCreate, OrderRequest, OrderRequestCreate, ReasonType,
};
use crate::db::repository::{
    OrderRepository, OrderRequestRepository, ReasonRepository, RepoError, RequestTransition,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::lifecycle::{OrderRequestStatus, OrderStatus, StatusChange};
use shared::util::snowflake_id;
use surrealdb::RecordId;

#[derive(Clone)]
pub struct LifecycleController {
    state: ServerState,
    requests: OrderRequestRepository,
    orders: OrderRepository,
    reasons: ReasonRepository,
}

impl LifecycleController {
    pub fn new(state: ServerState) -> Self {
        let db = state.get_db();
        let restaurant = state.restaurant_id().to_string();
        Self {
            requests: OrderRequestRepository::new(db.clone(), restaurant.clone()),
            orders: OrderRepository::new(db.clone(), restaurant.clone()),
            reasons: ReasonRepository::new(db, restaurant),
            state,
        }
    }

    /// Identity stamped into `status_updated_by` / `cancelled_by`
    fn actor(&self) -> &str {
        self.state.restaurant_id()
    }

    // ==================== Order requests ====================

    pub async fn create_request(&self, data: OrderRequestCreate) -> AppResult<OrderRequest> {
        self.requests.create(data).await.map_err(map_repo_err)
    }

    pub async fn get_request(&self, id: &str) -> AppResult<OrderRequest> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(map_repo_err)?
            .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound).with_detail("id", id))
    }

    pub async fn list_requests(
        &self,
        status: Option<OrderRequestStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<OrderRequest>, i64)> {
        self.requests
            .list(status, limit, offset)
            .await
            .map_err(map_repo_err)
    }

    /// PENDING -> CONFIRMED
    pub async fn confirm_request(&self, id: &str) -> AppResult<OrderRequest> {
        self.request_transition(
            id,
            &[OrderRequestStatus::Pending],
            OrderRequestStatus::Confirmed,
            RequestTransition::default(),
        )
        .await
    }

    /// WAITING -> CONFIRMED, the operator's follow-up once the kitchen frees up
    pub async fn confirm_waiting_request(&self, id: &str) -> AppResult<OrderRequest> {
        self.request_transition(
            id,
            &[OrderRequestStatus::Waiting],
            OrderRequestStatus::Confirmed,
            RequestTransition::default(),
        )
        .await
    }

    /// PENDING -> WAITING with a WAITING reason and an optional announced
    /// delay in minutes
    pub async fn set_waiting(
        &self,
        id: &str,
        reason_id: Option<String>,
        waiting_time: Option<i64>,
    ) -> AppResult<OrderRequest> {
        if let Some(minutes) = waiting_time
            && minutes < 1
        {
            // Never clamped: a zero or negative delay is a caller bug
            return Err(AppError::invalid_waiting_time(minutes));
        }
        let reason = self
            .require_reason(reason_id, ReasonType::Waiting, "set_waiting")
            .await?;
        self.request_transition(
            id,
            &[OrderRequestStatus::Pending],
            OrderRequestStatus::Waiting,
            RequestTransition {
                reason: Some(reason),
                waiting_time,
                cancelled_by: None,
            },
        )
        .await
    }

    /// PENDING or WAITING -> REJECTED
    pub async fn reject_request(
        &self,
        id: &str,
        reason_id: Option<String>,
    ) -> AppResult<OrderRequest> {
        let reason = self
            .require_reason(reason_id, ReasonType::Rejected, "reject_request")
            .await?;
        self.request_transition(
            id,
            &[OrderRequestStatus::Pending, OrderRequestStatus::Waiting],
            OrderRequestStatus::Rejected,
            RequestTransition {
                reason: Some(reason),
                waiting_time: None,
                cancelled_by: None,
            },
        )
        .await
    }

    /// PENDING, WAITING or CONFIRMED -> CANCELLED
    pub async fn cancel_request(
        &self,
        id: &str,
        reason_id: Option<String>,
    ) -> AppResult<OrderRequest> {
        let reason = self
            .require_reason(reason_id, ReasonType::Cancelled, "cancel_request")
            .await?;
        self.request_transition(
            id,
            &[
                OrderRequestStatus::Pending,
                OrderRequestStatus::Waiting,
                OrderRequestStatus::Confirmed,
            ],
            OrderRequestStatus::Cancelled,
            RequestTransition {
                reason: Some(reason),
                waiting_time: None,
                cancelled_by: Some(self.actor().to_string()),
            },
        )
        .await
    }

    /// Turn a confirmed request into a live order. The request keeps its
    /// CONFIRMED status; a marker field makes the conversion exactly-once.
    pub async fn convert_request(&self, id: &str) -> AppResult<Order> {
        let order_number = snowflake_id().to_string();
        let claimed = self
            .requests
            .mark_converted(id, &order_number)
            .await
            .map_err(map_repo_err)?
            .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound).with_detail("id", id))?;

        let order = self
            .orders
            .create_from_conversion(
                order_number,
                claimed.user_id,
                claimed.order_type,
                None,
                claimed.items,
                claimed.cart_total,
            )
            .await
            .map_err(map_repo_err)?;

        tracing::info!(
            request_id = %id,
            order_number = %order.order_number,
            "Converted request to order"
        );
        Ok(order)
    }

    /// Statuses an operator may move this request to from where it is now
    pub async fn request_next_statuses(&self, id: &str) -> AppResult<Vec<OrderRequestStatus>> {
        let request = self.get_request(id).await?;
        Ok(request.status.selectable())
    }

    async fn request_transition(
        &self,
        id: &str,
        from: &[OrderRequestStatus],
        to: OrderRequestStatus,
        extra: RequestTransition,
    ) -> AppResult<OrderRequest> {
        let outcome = self
            .requests
            .transition(id, from, to, self.actor(), extra)
            .await
            .map_err(map_repo_err)?;
        let Some((before, after)) = outcome else {
            return Err(AppError::request_conflict(id));
        };
        self.state.publish_status_change(
            id,
            StatusChange::OrderRequest {
                previous: before.status,
                new: after.status,
            },
        );
        Ok(after)
    }

    // ==================== Orders ====================

    pub async fn create_order(&self, data: OrderCreate) -> AppResult<Order> {
        let order_number = snowflake_id().to_string();
        self.orders
            .create(order_number, data)
            .await
            .map_err(|err| match err {
                RepoError::Duplicate(msg) => {
                    AppError::with_message(ErrorCode::OrderNumberExists, msg)
                }
                other => map_repo_err(other),
            })
    }

    pub async fn get_order(&self, id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(map_repo_err)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))
    }

    pub async fn get_order_by_number(&self, order_number: &str) -> AppResult<Order> {
        self.orders
            .find_by_number(order_number)
            .await
            .map_err(map_repo_err)?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_number", order_number)
            })
    }

    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Order>, i64)> {
        self.orders
            .list(status, limit, offset)
            .await
            .map_err(map_repo_err)
    }

    /// WAITING -> CONFIRMED
    pub async fn confirm_order(&self, id: &str) -> AppResult<Order> {
        let outcome = self.orders.confirm(id, self.actor()).await;
        self.finish_order_transition(id, outcome)
    }

    /// CONFIRMED -> PREPARING
    pub async fn start_preparing(&self, id: &str) -> AppResult<Order> {
        let outcome = self.orders.to_preparing(id, self.actor()).await;
        self.finish_order_transition(id, outcome)
    }

    /// PREPARING -> READY
    pub async fn mark_ready(&self, id: &str) -> AppResult<Order> {
        let outcome = self.orders.to_ready(id, self.actor()).await;
        self.finish_order_transition(id, outcome)
    }

    /// READY -> SERVED, dine-in only
    pub async fn mark_served(&self, id: &str) -> AppResult<Order> {
        let outcome = self.orders.to_served(id, self.actor()).await;
        self.finish_order_transition(id, outcome)
    }

    /// SERVED -> COMPLETED for dine-in, READY -> COMPLETED for takeaway
    pub async fn complete_order(&self, id: &str) -> AppResult<Order> {
        let outcome = self.orders.to_completed(id, self.actor()).await;
        self.finish_order_transition(id, outcome)
    }

    /// CONFIRMED or PREPARING -> CANCELLED. Unlike request cancellation
    /// the reason is optional here; when supplied it must be an active
    /// CANCELLED catalog entry.
    pub async fn cancel_order(&self, id: &str, reason_id: Option<String>) -> AppResult<Order> {
        let reason = match reason_id {
            Some(reason_id) => Some(
                self.require_reason(Some(reason_id), ReasonType::Cancelled, "cancel_order")
                    .await?,
            ),
            None => None,
        };
        let outcome = self.orders.cancel(id, self.actor(), reason).await;
        self.finish_order_transition(id, outcome)
    }

    /// Statuses an operator may move this order to from where it is now
    pub async fn order_next_statuses(&self, id: &str) -> AppResult<Vec<OrderStatus>> {
        let order = self.get_order(id).await?;
        Ok(order.status.selectable(order.order_type))
    }

    fn finish_order_transition(
        &self,
        id: &str,
        outcome: Result<Option<(Order, Order)>, RepoError>,
    ) -> AppResult<Order> {
        let Some((before, after)) = outcome.map_err(map_repo_err)? else {
            return Err(AppError::order_conflict(id));
        };
        self.state.publish_status_change(
            id,
            StatusChange::Order {
                previous: before.status,
                new: after.status,
            },
        );
        Ok(after)
    }

    // ==================== Reasons ====================

    /// Resolve a required reason id into an active catalog entry of the
    /// right type
    async fn require_reason(
        &self,
        reason_id: Option<String>,
        reason_type: ReasonType,
        operation: &str,
    ) -> AppResult<RecordId> {
        let Some(reason_id) = reason_id else {
            return Err(AppError::reason_required(operation));
        };
        let reason = self
            .reasons
            .find_active(&reason_id, reason_type)
            .await
            .map_err(map_repo_err)?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ReasonNotFound).with_detail("id", reason_id)
            })?;
        reason
            .id
            .ok_or_else(|| AppError::internal("Reason record has no id"))
    }
}

pub(crate) fn map_repo_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Duplicate(msg) => AppError::conflict(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}
