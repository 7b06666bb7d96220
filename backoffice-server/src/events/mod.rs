//! Status-changed event fan-out
//!
//! - [`EventHub`] - process-wide subscription hub
//! - [`ResourceVersions`] - lock-free per-entity version counters

pub mod hub;
pub mod versions;

pub use hub::EventHub;
pub use versions::ResourceVersions;
