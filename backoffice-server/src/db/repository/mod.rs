//! Repository Module
//!
//! Data access for SurrealDB tables. Status transitions use a single guarded
//! UPDATE (`WHERE ... AND status IN $from RETURN BEFORE`) so concurrent
//! operators race safely: exactly one UPDATE matches, the rest see an empty
//! result and report a conflict.

pub mod order;
pub mod order_request;
pub mod reason;

pub use order::OrderRepository;
pub use order_request::{OrderRequestRepository, RequestTransition};
pub use reason::ReasonRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
