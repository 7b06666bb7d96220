use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::lifecycle::{StatusChange, StatusChangedEvent};

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::events::{EventHub, ResourceVersions};

/// Server state - shared handles to every service
///
/// `ServerState` is the core data structure of the node, holding shared
/// references to all services. Cloning is shallow (Arc-backed) and cheap.
///
/// # Components
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded database |
/// | hub | Arc<EventHub> | Status-changed event hub |
/// | resource_versions | Arc<ResourceVersions> | Per-entity version counters |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Process-wide status-changed event hub
    pub hub: Arc<EventHub>,
    /// Version counters attached to published events
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// Create server state from already-built parts
    ///
    /// Usually [`ServerState::initialize`] is what you want
    pub fn new(config: Config, db: Surreal<Db>, hub: Arc<EventHub>) -> Self {
        Self {
            config,
            db,
            hub,
            resource_versions: Arc::new(ResourceVersions::new()),
        }
    }

    /// Initialize server state
    ///
    /// 1. Ensure the work directory layout exists
    /// 2. Open the database (work_dir/database/backoffice.db)
    /// 3. Build the event hub
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("backoffice.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let hub = Arc::new(EventHub::new(config.event_channel_capacity));

        Ok(Self::new(config.clone(), db_service.db, hub))
    }

    /// Initialize with an in-memory database (tests, oneshot tooling)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db_service = DbService::open_in_memory().await?;
        let hub = Arc::new(EventHub::new(config.event_channel_capacity));
        Ok(Self::new(config.clone(), db_service.db, hub))
    }

    /// Start background tasks
    ///
    /// Must be called before `Server::run()` serves traffic.
    pub fn start_background_tasks(&self) {
        self.hub.clone().start_dispatcher();
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Acting restaurant identity; scopes every persistence query
    pub fn restaurant_id(&self) -> &str {
        &self.config.restaurant_id
    }

    /// Event hub handle
    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    /// Publish a committed status change to the hub
    ///
    /// Stamps the event with the next version for its entity kind, so
    /// subscribers can discard stale updates.
    pub fn publish_status_change(&self, entity_id: &str, change: StatusChange) {
        let mut event = StatusChangedEvent::new(entity_id, change);
        event.version = self.resource_versions.increment(change.entity().as_str());

        tracing::debug!(
            entity = change.entity().as_str(),
            entity_id = %event.entity_id,
            previous = change.previous_str(),
            new = change.new_str(),
            version = event.version,
            "status changed"
        );

        self.hub.publish(event);
    }
}
