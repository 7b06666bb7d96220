//! Status-changed events
//!
//! Emitted by the lifecycle controller after each *committed* transition.
//! A failed CAS never produces an event.

use super::status::{OrderRequestStatus, OrderStatus};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Which lifecycle entity an event refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEntity {
    OrderRequest,
    Order,
}

impl LifecycleEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderRequest => "ORDER_REQUEST",
            Self::Order => "ORDER",
        }
    }
}

/// The typed before/after pair of a committed transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "entity", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusChange {
    OrderRequest {
        previous: OrderRequestStatus,
        new: OrderRequestStatus,
    },
    Order {
        previous: OrderStatus,
        new: OrderStatus,
    },
}

impl StatusChange {
    pub fn entity(&self) -> LifecycleEntity {
        match self {
            Self::OrderRequest { .. } => LifecycleEntity::OrderRequest,
            Self::Order { .. } => LifecycleEntity::Order,
        }
    }

    /// Previous status as its wire string
    pub fn previous_str(&self) -> &'static str {
        match self {
            Self::OrderRequest { previous, .. } => previous.as_str(),
            Self::Order { previous, .. } => previous.as_str(),
        }
    }

    /// New status as its wire string
    pub fn new_str(&self) -> &'static str {
        match self {
            Self::OrderRequest { new, .. } => new.as_str(),
            Self::Order { new, .. } => new.as_str(),
        }
    }
}

/// Event published on the hub after a committed transition
///
/// Carries exactly what subscribers need to update their view:
/// `{entity, entity_id, previous, new, timestamp}` plus a per-entity
/// monotonically increasing `version` so consumers can discard stale
/// updates delivered out of order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChangedEvent {
    /// Unique event id
    pub event_id: String,
    /// Record id of the affected entity ("order:xyz" / "order_request:xyz")
    pub entity_id: String,
    /// Typed before/after statuses
    #[serde(flatten)]
    pub change: StatusChange,
    /// Per-entity version counter, assigned by the hub at publish time
    #[serde(default)]
    pub version: u64,
    /// Commit timestamp (UTC millis)
    pub timestamp_ms: i64,
}

impl StatusChangedEvent {
    pub fn new(entity_id: impl Into<String>, change: StatusChange) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            entity_id: entity_id.into(),
            change,
            version: 0,
            timestamp_ms: now_millis(),
        }
    }

    pub fn entity(&self) -> LifecycleEntity {
        self.change.entity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = StatusChangedEvent::new(
            "order:abc",
            StatusChange::Order {
                previous: OrderStatus::Confirmed,
                new: OrderStatus::Preparing,
            },
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["entity"], "ORDER");
        assert_eq!(json["entity_id"], "order:abc");
        assert_eq!(json["previous"], "CONFIRMED");
        assert_eq!(json["new"], "PREPARING");
        assert!(json["timestamp_ms"].as_i64().unwrap() > 0);

        let back: StatusChangedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_change_accessors() {
        let change = StatusChange::OrderRequest {
            previous: OrderRequestStatus::Pending,
            new: OrderRequestStatus::Waiting,
        };
        assert_eq!(change.entity(), LifecycleEntity::OrderRequest);
        assert_eq!(change.previous_str(), "PENDING");
        assert_eq!(change.new_str(), "WAITING");
    }
}
