use thiserror::Error;

/// Server bootstrap/runtime errors
///
/// Request-level errors use [`shared::error::AppError`]; this type covers
/// failures while bringing the server up or tearing it down.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<surrealdb::Error> for ServerError {
    fn from(err: surrealdb::Error) -> Self {
        ServerError::Database(err.to_string())
    }
}

/// Result alias for server bootstrap paths
pub type Result<T> = std::result::Result<T, ServerError>;
