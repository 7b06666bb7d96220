//! Order Repository
//!
//! Fulfilment transitions share one guarded-update shape; the per-operation
//! methods differ only in the status guard. Serve and complete fold the
//! order-type rules into the guard itself, so a takeaway "serve" attempt
//! fails the same way a stale status does.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CartItem, Order, OrderCreate, PaymentMethod};
use shared::lifecycle::{OrderStatus, OrderType};
use shared::util::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

// Status guards, one per transition
const GUARD_CONFIRM: &str = "status = 'WAITING'";
const GUARD_PREPARING: &str = "status = 'CONFIRMED'";
const GUARD_READY: &str = "status = 'PREPARING'";
const GUARD_SERVED: &str = "status = 'READY' AND order_type = 'DINE_IN'";
const GUARD_COMPLETED: &str =
    "(status = 'SERVED' OR (status = 'READY' AND order_type != 'DINE_IN'))";
const GUARD_CANCEL: &str = "status IN ['CONFIRMED', 'PREPARING']";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    restaurant: String,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, restaurant: impl Into<String>) -> Self {
        Self {
            base: BaseRepository::new(db),
            restaurant: restaurant.into(),
        }
    }

    /// Insert a new order in WAITING
    pub async fn create(
        &self,
        order_number: String,
        data: OrderCreate,
    ) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }
        if self.find_by_number(&order_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Order number '{}' already exists",
                order_number
            )));
        }

        let now = now_rfc3339();
        let mut items = data.items;
        for item in &mut items {
            item.line_total = item.computed_line_total();
        }
        let total_amount = items.iter().map(|i| i.line_total).sum();

        self.insert(Order {
            id: None,
            restaurant: self.restaurant.clone(),
            order_number,
            user_id: data.user_id,
            order_type: data.order_type,
            payment_method: data.payment_method,
            total_amount,
            status: OrderStatus::Waiting,
            items,
            reason: None,
            status_updated_by: None,
            cancelled_by: None,
            created_at: now.clone(),
            updated_at: now,
        })
        .await
    }

    /// Insert an order built from a converted request. Caller supplies the
    /// full cart snapshot; totals are taken as-is.
    pub async fn create_from_conversion(
        &self,
        order_number: String,
        user_id: String,
        order_type: OrderType,
        payment_method: Option<PaymentMethod>,
        items: Vec<CartItem>,
        total_amount: f64,
    ) -> RepoResult<Order> {
        let now = now_rfc3339();
        self.insert(Order {
            id: None,
            restaurant: self.restaurant.clone(),
            order_number,
            user_id,
            order_type,
            payment_method,
            total_amount,
            status: OrderStatus::Waiting,
            items,
            reason: None,
            status_updated_by: None,
            cancelled_by: None,
            created_at: now.clone(),
            updated_at: now,
        })
        .await
    }

    async fn insert(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find an order by id within this restaurant
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = self.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $id AND restaurant = $restaurant")
            .bind(("id", thing))
            .bind(("restaurant", self.restaurant.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find an order by its order number within this restaurant
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE order_number = $number AND restaurant = $restaurant LIMIT 1",
            )
            .bind(("number", order_number.to_string()))
            .bind(("restaurant", self.restaurant.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// List orders, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let filter = match status {
            Some(_) => " AND status = $status",
            None => "",
        };
        let limit = limit.clamp(1, 500);
        let offset = offset.max(0);
        let query = format!(
            "SELECT * FROM order WHERE restaurant = $restaurant{filter} \
             ORDER BY created_at DESC LIMIT {limit} START {offset}; \
             SELECT count() AS total FROM order \
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
        let orders: Vec<Order> = result.take(0)?;
        let totals: Vec<CountRow> = result.take(1)?;
        let total = totals.first().map_or(0, |c| c.total);
        Ok((orders, total))
    }

    pub async fn confirm(
        &self,
        id: &str,
        actor: &str,
    ) -> RepoResult<Option<(Order, Order)>> {
        self.transition(id, GUARD_CONFIRM, OrderStatus::Confirmed, actor, None, None)
            .await
    }

    pub async fn to_preparing(
        &self,
        id: &str,
        actor: &str,
    ) -> RepoResult<Option<(Order, Order)>> {
        self.transition(id, GUARD_PREPARING, OrderStatus::Preparing, actor, None, None)
            .await
    }

    pub async fn to_ready(&self, id: &str, actor: &str) -> RepoResult<Option<(Order, Order)>> {
        self.transition(id, GUARD_READY, OrderStatus::Ready, actor, None, None)
            .await
    }

    /// Dine-in only: READY -> SERVED
    pub async fn to_served(&self, id: &str, actor: &str) -> RepoResult<Option<(Order, Order)>> {
        self.transition(id, GUARD_SERVED, OrderStatus::Served, actor, None, None)
            .await
    }

    /// SERVED -> COMPLETED for dine-in, READY -> COMPLETED otherwise
    pub async fn to_completed(
        &self,
        id: &str,
        actor: &str,
    ) -> RepoResult<Option<(Order, Order)>> {
        self.transition(id, GUARD_COMPLETED, OrderStatus::Completed, actor, None, None)
            .await
    }

    pub async fn cancel(
        &self,
        id: &str,
        actor: &str,
        reason: Option<RecordId>,
    ) -> RepoResult<Option<(Order, Order)>> {
        self.transition(
            id,
            GUARD_CANCEL,
            OrderStatus::Cancelled,
            actor,
            reason,
            Some(actor.to_string()),
        )
        .await
    }

    async fn transition(
        &self,
        id: &str,
        guard: &str,
        to: OrderStatus,
        actor: &str,
        reason: Option<RecordId>,
        cancelled_by: Option<String>,
    ) -> RepoResult<Option<(Order, Order)>> {
        let thing = self.parse_id(id)?;

        let mut set = String::from(
            "status = $to, status_updated_by = $actor, updated_at = $now",
        );
        if reason.is_some() {
            set.push_str(", reason = $reason");
        }
        if cancelled_by.is_some() {
            set.push_str(", cancelled_by = $cancelled_by");
        }
        let query = format!(
            "UPDATE order SET {set} \
             WHERE id = $id AND restaurant = $restaurant AND {guard} \
             RETURN BEFORE"
        );

        let now = now_rfc3339();
        let mut q = self
            .base
            .db()
            .query(query)
            .bind(("id", thing))
            .bind(("restaurant", self.restaurant.clone()))
            .bind(("to", to.as_str()))
            .bind(("actor", actor.to_string()))
            .bind(("now", now.clone()));
        if let Some(reason) = reason.clone() {
            q = q.bind(("reason", reason));
        }
        if let Some(cancelled_by) = cancelled_by.clone() {
            q = q.bind(("cancelled_by", cancelled_by));
        }
        let mut result = q.await?;
        let before: Vec<Order> = result.take(0)?;
        let Some(before) = before.into_iter().next() else {
            return Ok(None);
        };

        // Reconstruct the written record from the snapshot and the SET
        // fields; a refetch could observe a later concurrent transition
        let after = Order {
            status: to,
            status_updated_by: Some(actor.to_string()),
            updated_at: now,
            reason: reason.or_else(|| before.reason.clone()),
            cancelled_by: cancelled_by.or_else(|| before.cancelled_by.clone()),
            ..before.clone()
        };
        Ok(Some((before, after)))
    }

    fn parse_id(&self, id: &str) -> RepoResult<RecordId> {
        if let Ok(thing) = id.parse::<RecordId>() {
            return Ok(thing);
        }
        Ok(RecordId::from_table_key(TABLE, id))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    total: i64,
}
