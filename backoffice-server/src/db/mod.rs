//! Database Module
//!
//! Embedded SurrealDB storage: connection handling plus schema definitions
//! (unique indexes) applied at startup.

pub mod models;
pub mod repository;

use crate::core::ServerError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, ServerError> {
        let db = Surreal::new::<RocksDb>(db_path).await?;
        Self::init(db).await
    }

    /// Open a fresh in-memory database (tests, oneshot tooling)
    pub async fn open_in_memory() -> Result<Self, ServerError> {
        let db = Surreal::new::<Mem>(()).await?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, ServerError> {
        db.use_ns("backoffice").use_db("main").await?;

        // Order numbers must stay unique across restarts
        db.query("DEFINE INDEX IF NOT EXISTS uniq_order_number ON TABLE order FIELDS order_number UNIQUE")
            .await?;
        db.query("DEFINE INDEX IF NOT EXISTS idx_order_status ON TABLE order FIELDS status")
            .await?;
        db.query("DEFINE INDEX IF NOT EXISTS idx_request_status ON TABLE order_request FIELDS status")
            .await?;

        tracing::info!("Database ready (embedded SurrealDB)");

        Ok(Self { db })
    }
}
