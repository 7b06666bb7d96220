//! Unified error codes for the back-office framework
//!
//! This module defines all error codes used across the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order lifecycle errors
//! - 7xxx: Reason catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order lifecycle ====================
    /// Order missing, wrong restaurant, or its persisted status no longer
    /// matches the operation's precondition. One code covers all three.
    OrderNotFound = 4001,
    /// Order number already allocated
    OrderNumberExists = 4002,
    /// Order request missing, wrong restaurant, or stale status
    /// (same indistinguishability rule as [`ErrorCode::OrderNotFound`])
    RequestNotFound = 4101,
    /// Transition requires a reason id but none was supplied
    ReasonRequired = 4201,
    /// Waiting time must be a positive integer number of minutes
    InvalidWaitingTime = 4202,

    // ==================== 7xxx: Reason catalog ====================
    /// Reason not found
    ReasonNotFound = 7001,
    /// Reason with the same text already exists for this type
    ReasonTextExists = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Event hub channel closed
    EventHubClosed = 9101,
}

impl ErrorCode {
    /// Get the numeric value of this error code
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Order lifecycle
            ErrorCode::OrderNotFound => "Order not found or status changed",
            ErrorCode::OrderNumberExists => "Order number already exists",
            ErrorCode::RequestNotFound => "Order request not found or status changed",
            ErrorCode::ReasonRequired => "A reason is required for this transition",
            ErrorCode::InvalidWaitingTime => "Waiting time must be a positive number of minutes",

            // Reason catalog
            ErrorCode::ReasonNotFound => "Reason not found",
            ErrorCode::ReasonTextExists => "Reason text already exists for this type",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::EventHubClosed => "Event hub channel closed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order lifecycle
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNumberExists),
            4101 => Ok(ErrorCode::RequestNotFound),
            4201 => Ok(ErrorCode::ReasonRequired),
            4202 => Ok(ErrorCode::InvalidWaitingTime),

            // Reason catalog
            7001 => Ok(ErrorCode::ReasonNotFound),
            7002 => Ok(ErrorCode::ReasonTextExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::EventHubClosed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
