//! Order Request Repository
//!
//! All reads are restaurant-scoped. Transitions are guarded updates: the
//! caller names the statuses it is willing to move from and the database
//! applies the change atomically, returning the record as it was before the
//! update so the previous status can be reported.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OrderRequest, OrderRequestCreate};
use shared::lifecycle::OrderRequestStatus;
use shared::util::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order_request";

/// Mutation applied alongside a guarded status change
#[derive(Debug, Default, Clone)]
pub struct RequestTransition {
    pub reason: Option<RecordId>,
    pub waiting_time: Option<i64>,
    pub cancelled_by: Option<String>,
}

#[derive(Clone)]
pub struct OrderRequestRepository {
    base: BaseRepository,
    restaurant: String,
}

impl OrderRequestRepository {
    pub fn new(db: Surreal<Db>, restaurant: impl Into<String>) -> Self {
        Self {
            base: BaseRepository::new(db),
            restaurant: restaurant.into(),
        }
    }

    /// Create a new request in PENDING
    pub async fn create(&self, data: OrderRequestCreate) -> RepoResult<OrderRequest> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order request must contain at least one item".to_string(),
            ));
        }

        let now = now_rfc3339();
        let mut items = data.items;
        for item in &mut items {
            if item.quantity <= 0 {
                return Err(RepoError::Validation(format!(
                    "Invalid quantity for item '{}'",
                    item.name
                )));
            }
            item.line_total = item.computed_line_total();
        }
        let cart_total = items.iter().map(|i| i.line_total).sum();

        let request = OrderRequest {
            id: None,
            restaurant: self.restaurant.clone(),
            user_id: data.user_id,
            order_type: data.order_type,
            items,
            cart_total,
            status: OrderRequestStatus::Pending,
            waiting_time: None,
            reason: None,
            status_updated_by: None,
            cancelled_by: None,
            converted_order_number: None,
            created_at: now.clone(),
            updated_at: now,
        };

        let created: Option<OrderRequest> = self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order request".to_string()))
    }

    /// Find a request by id within this restaurant
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderRequest>> {
        let thing = self.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_request WHERE id = $id AND restaurant = $restaurant")
            .bind(("id", thing))
            .bind(("restaurant", self.restaurant.clone()))
            .await?;
        let requests: Vec<OrderRequest> = result.take(0)?;
        Ok(requests.into_iter().next())
    }

    /// List requests, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<OrderRequestStatus>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<(Vec<OrderRequest>, i64)> {
        let filter = match status {
            Some(_) => " AND status = $status",
            None => "",
        };
        let limit = limit.clamp(1, 500);
        let offset = offset.max(0);
        let query = format!(
            "SELECT * FROM order_request WHERE restaurant = $restaurant{filter} \
             ORDER BY created_at DESC LIMIT {limit} START {offset}; \
             SELECT count() AS total FROM order_request \
             WHERE restaurant = $restaurant{filter} GROUP ALL;"
        );
        let mut q = self
            .base
            .db()
            .query(query)
            .bind(("restaurant", self.restaurant.clone()));
        if let Some(status) = status {
            q = q.bind(("status", status.as_str()));
        }
        let mut result = q.await?;
        let requests: Vec<OrderRequest> = result.take(0)?;
        let totals: Vec<CountRow> = result.take(1)?;
        let total = totals.first().map_or(0, |c| c.total);
        Ok((requests, total))
    }

    /// Guarded status change. Returns `None` when no row matched, meaning
    /// the request does not exist here or its status was not in `from`.
    /// On success returns the record before and after the update.
    pub async fn transition(
        &self,
        id: &str,
        from: &[OrderRequestStatus],
        to: OrderRequestStatus,
        actor: &str,
        extra: RequestTransition,
    ) -> RepoResult<Option<(OrderRequest, OrderRequest)>> {
        let thing = self.parse_id(id)?;

        let mut set = String::from(
            "status = $to, status_updated_by = $actor, updated_at = $now",
        );
        if extra.reason.is_some() {
            set.push_str(", reason = $reason");
        }
        if extra.waiting_time.is_some() {
            set.push_str(", waiting_time = $waiting_time");
        }
        if extra.cancelled_by.is_some() {
            set.push_str(", cancelled_by = $cancelled_by");
        }
        let query = format!(
            "UPDATE order_request SET {set} \
             WHERE id = $id AND restaurant = $restaurant AND status IN $from \
             RETURN BEFORE"
        );

        let from: Vec<&'static str> = from.iter().map(|s| s.as_str()).collect();
        let now = now_rfc3339();
        let mut q = self
            .base
            .db()
            .query(query)
            .bind(("id", thing))
            .bind(("restaurant", self.restaurant.clone()))
            .bind(("from", from))
            .bind(("to", to.as_str()))
            .bind(("actor", actor.to_string()))
            .bind(("now", now.clone()));
        if let Some(reason) = extra.reason.clone() {
            q = q.bind(("reason", reason));
        }
        if let Some(waiting_time) = extra.waiting_time {
            q = q.bind(("waiting_time", waiting_time));
        }
        if let Some(cancelled_by) = extra.cancelled_by.clone() {
            q = q.bind(("cancelled_by", cancelled_by));
        }
        let mut result = q.await?;
        let before: Vec<OrderRequest> = result.take(0)?;
        let Some(before) = before.into_iter().next() else {
            return Ok(None);
        };

        // Reconstruct the written record from the snapshot and the SET
        // fields; a refetch could observe a later concurrent transition
        let after = OrderRequest {
            status: to,
            status_updated_by: Some(actor.to_string()),
            updated_at: now,
            reason: extra.reason.or_else(|| before.reason.clone()),
            waiting_time: extra.waiting_time.or(before.waiting_time),
            cancelled_by: extra.cancelled_by.or_else(|| before.cancelled_by.clone()),
            ..before.clone()
        };
        Ok(Some((before, after)))
    }

    /// Claim a confirmed request for conversion. The `converted_order_number
    /// IS NONE` guard makes the claim exactly-once; a second caller gets
    /// `None` while the request stays CONFIRMED.
    pub async fn mark_converted(
        &self,
        id: &str,
        order_number: &str,
    ) -> RepoResult<Option<OrderRequest>> {
        let thing = self.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order_request \
                 SET converted_order_number = $number, updated_at = $now \
                 WHERE id = $id AND restaurant = $restaurant \
                   AND status = 'CONFIRMED' AND converted_order_number IS NONE \
                 RETURN AFTER",
            )
            .bind(("id", thing))
            .bind(("restaurant", self.restaurant.clone()))
            .bind(("number", order_number.to_string()))
            .bind(("now", now_rfc3339()))
            .await?;
        let updated: Vec<OrderRequest> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    fn parse_id(&self, id: &str) -> RepoResult<RecordId> {
        if let Ok(thing) = id.parse::<RecordId>() {
            return Ok(thing);
        }
        // Bare key without the table prefix
        Ok(RecordId::from_table_key(TABLE, id))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    total: i64,
}
