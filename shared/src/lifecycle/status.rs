//! Status enums and transition tables

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Type
// ============================================================================

/// Service type of a request/order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Eat in the restaurant
    #[default]
    DineIn,
    /// Takeaway / pick up
    Takeaway,
}

impl OrderType {
    pub fn is_dine_in(&self) -> bool {
        matches!(self, Self::DineIn)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "DINE_IN",
            Self::Takeaway => "TAKEAWAY",
        }
    }
}

// ============================================================================
// Order Request Status
// ============================================================================

/// Status of a pre-confirmation order request
///
/// Legal transitions:
///
/// ```text
/// PENDING ──► CONFIRMED | WAITING | REJECTED
/// WAITING ──► CONFIRMED | REJECTED | CANCELLED
/// CONFIRMED ──► CANCELLED          (conversion to an Order is separate)
/// REJECTED, CANCELLED              terminal
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderRequestStatus {
    #[default]
    Pending,
    Confirmed,
    Waiting,
    Rejected,
    Cancelled,
}

impl OrderRequestStatus {
    /// SCREAMING_SNAKE_CASE wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Waiting => "WAITING",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// No outgoing edges at all
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Whether the edge `self → next` exists in the transition table
    pub fn can_transition_to(&self, next: Self) -> bool {
        use OrderRequestStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Waiting)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Waiting, Confirmed)
                | (Waiting, Rejected)
                | (Waiting, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    /// The single forward edge from this status, if any
    ///
    /// `CONFIRMED` has no forward edge here: the forward step (conversion to
    /// an Order) is a separate operation, and cancellation never counts as
    /// a forward option.
    pub fn forward_target(&self) -> Option<Self> {
        match self {
            Self::Pending | Self::Waiting => Some(Self::Confirmed),
            _ => None,
        }
    }

    /// Selectable-next-status helper for presentation layers
    ///
    /// Returns `[current, next]` along the forward edge, or `[current]`
    /// alone when no forward step exists. Never offers skip-ahead or
    /// backward options.
    pub fn selectable(&self) -> Vec<Self> {
        match self.forward_target() {
            Some(next) => vec![*self, next],
            None => vec![*self],
        }
    }
}

// ============================================================================
// Order Status
// ============================================================================

/// Status of a confirmed, in-progress order
///
/// Legal transitions (each guarded by a status CAS at the persistence layer):
///
/// ```text
/// WAITING ──► CONFIRMED
/// CONFIRMED ──► PREPARING | CANCELLED
/// PREPARING ──► READY | CANCELLED
/// READY ──► SERVED      (dine-in only)
/// READY ──► COMPLETED   (non-dine-in only)
/// SERVED ──► COMPLETED
/// COMPLETED, CANCELLED, REFUNDED   terminal
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Waiting,
    Confirmed,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// SCREAMING_SNAKE_CASE wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Served => "SERVED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refunded)
    }

    /// Whether the edge `self → next` exists for the given order type
    pub fn can_transition_to(&self, next: Self, order_type: OrderType) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Waiting, Confirmed) => true,
            (Confirmed, Preparing) => true,
            (Preparing, Ready) => true,
            (Ready, Served) => order_type.is_dine_in(),
            (Ready, Completed) => !order_type.is_dine_in(),
            (Served, Completed) => true,
            (Confirmed, Cancelled) | (Preparing, Cancelled) => true,
            _ => false,
        }
    }

    /// The single forward edge from this status for the given order type
    pub fn forward_target(&self, order_type: OrderType) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => {
                if order_type.is_dine_in() {
                    Some(Self::Served)
                } else {
                    Some(Self::Completed)
                }
            }
            Self::Served => Some(Self::Completed),
            Self::Completed | Self::Cancelled | Self::Refunded => None,
        }
    }

    /// Selectable-next-status helper for presentation layers
    ///
    /// Returns `[current, next]` along the forward edge, or `[current]`
    /// alone for terminal statuses.
    pub fn selectable(&self, order_type: OrderType) -> Vec<Self> {
        match self.forward_target(order_type) {
            Some(next) => vec![*self, next],
            None => vec![*self],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_transition_table() {
        use OrderRequestStatus::*;

        let all = [Pending, Confirmed, Waiting, Rejected, Cancelled];
        let legal = [
            (Pending, Confirmed),
            (Pending, Waiting),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Waiting, Confirmed),
            (Waiting, Rejected),
            (Waiting, Cancelled),
            (Confirmed, Cancelled),
        ];

        for from in all {
            for to in all {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "edge {:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_request_terminal() {
        assert!(OrderRequestStatus::Rejected.is_terminal());
        assert!(OrderRequestStatus::Cancelled.is_terminal());
        assert!(!OrderRequestStatus::Pending.is_terminal());
        assert!(!OrderRequestStatus::Confirmed.is_terminal());
    }

    #[test]
    fn test_request_selectable() {
        use OrderRequestStatus::*;
        assert_eq!(Pending.selectable(), vec![Pending, Confirmed]);
        assert_eq!(Waiting.selectable(), vec![Waiting, Confirmed]);
        // Confirmed has no forward edge within the request lifecycle
        assert_eq!(Confirmed.selectable(), vec![Confirmed]);
        assert_eq!(Rejected.selectable(), vec![Rejected]);
        assert_eq!(Cancelled.selectable(), vec![Cancelled]);
    }

    #[test]
    fn test_order_transition_table_dine_in() {
        use OrderStatus::*;

        assert!(Waiting.can_transition_to(Confirmed, OrderType::DineIn));
        assert!(Confirmed.can_transition_to(Preparing, OrderType::DineIn));
        assert!(Preparing.can_transition_to(Ready, OrderType::DineIn));
        assert!(Ready.can_transition_to(Served, OrderType::DineIn));
        assert!(Served.can_transition_to(Completed, OrderType::DineIn));
        assert!(Confirmed.can_transition_to(Cancelled, OrderType::DineIn));
        assert!(Preparing.can_transition_to(Cancelled, OrderType::DineIn));

        // Dine-in never completes straight from READY
        assert!(!Ready.can_transition_to(Completed, OrderType::DineIn));
        // No skip-ahead or backward edges
        assert!(!Confirmed.can_transition_to(Ready, OrderType::DineIn));
        assert!(!Ready.can_transition_to(Preparing, OrderType::DineIn));
        assert!(!Completed.can_transition_to(Cancelled, OrderType::DineIn));
        // READY is past the point of no return for cancellation
        assert!(!Ready.can_transition_to(Cancelled, OrderType::DineIn));
    }

    #[test]
    fn test_order_transition_table_takeaway() {
        use OrderStatus::*;

        assert!(Ready.can_transition_to(Completed, OrderType::Takeaway));
        assert!(!Ready.can_transition_to(Served, OrderType::Takeaway));
    }

    #[test]
    fn test_order_selectable() {
        use OrderStatus::*;
        assert_eq!(
            Confirmed.selectable(OrderType::DineIn),
            vec![Confirmed, Preparing]
        );
        assert_eq!(Ready.selectable(OrderType::DineIn), vec![Ready, Served]);
        assert_eq!(
            Ready.selectable(OrderType::Takeaway),
            vec![Ready, Completed]
        );
        assert_eq!(Completed.selectable(OrderType::DineIn), vec![Completed]);
        assert_eq!(Refunded.selectable(OrderType::Takeaway), vec![Refunded]);
    }

    #[test]
    fn test_status_serde_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Preparing).unwrap(),
            "\"PREPARING\""
        );
        assert_eq!(
            serde_json::to_string(&OrderRequestStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::DineIn).unwrap(),
            "\"DINE_IN\""
        );
        let back: OrderStatus = serde_json::from_str("\"SERVED\"").unwrap();
        assert_eq!(back, OrderStatus::Served);
    }
}
