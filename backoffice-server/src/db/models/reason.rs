//! Reason Catalog Model
//!
//! Reusable explanation texts referenced by the waiting, reject and cancel
//! transitions. Reasons are soft-deactivated (`is_active`) rather than
//! deleted so historical references stay resolvable.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Which transition a reason may be attached to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonType {
    Waiting,
    Rejected,
    Cancelled,
}

impl ReasonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonType::Waiting => "WAITING",
            ReasonType::Rejected => "REJECTED",
            ReasonType::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reason {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub restaurant: String,
    pub reason_type: ReasonType,
    pub text: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReasonCreate {
    pub reason_type: ReasonType,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReasonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active_defaults_to_true() {
        let json = r#"{
            "restaurant": "r1",
            "reason_type": "WAITING",
            "text": "Kitchen backed up",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let reason: Reason = serde_json::from_str(json).unwrap();
        assert!(reason.is_active);

        // An explicit null also reads as active
        let json = r#"{
            "restaurant": "r1",
            "reason_type": "REJECTED",
            "text": "Out of stock",
            "is_active": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let reason: Reason = serde_json::from_str(json).unwrap();
        assert!(reason.is_active);

        let json = r#"{
            "restaurant": "r1",
            "reason_type": "CANCELLED",
            "text": "Closed",
            "is_active": false,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let reason: Reason = serde_json::from_str(json).unwrap();
        assert!(!reason.is_active);
    }
}
