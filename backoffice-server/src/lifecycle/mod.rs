//! Lifecycle Module
//!
//! Business rules for order requests and orders: which transitions exist,
//! what each one requires (reasons, waiting times, order-type rules) and
//! the event published after a committed change.

pub mod controller;

pub use controller::LifecycleController;
