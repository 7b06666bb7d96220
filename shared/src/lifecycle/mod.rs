//! Order lifecycle domain
//!
//! Statuses and legal transitions for the two lifecycle entities:
//!
//! - **Order request**: a customer's submitted cart awaiting restaurant
//!   approval (`PENDING → CONFIRMED/WAITING/REJECTED`, ...)
//! - **Order**: a confirmed order moving through kitchen/service stages
//!   (`WAITING → CONFIRMED → PREPARING → READY → SERVED/COMPLETED`, ...)
//!
//! The tables here are the single source of truth for which transitions are
//! legal; the persistence layer enforces them with status-guarded
//! conditional updates (compare-and-swap on the status field).

pub mod event;
pub mod status;

pub use event::{LifecycleEntity, StatusChange, StatusChangedEvent};
pub use status::{OrderRequestStatus, OrderStatus, OrderType};
