//! Back Office Server - restaurant order lifecycle backend
//!
//! # Architecture overview
//!
//! The server owns the order lifecycle for a single restaurant:
//!
//! - **Lifecycle controller** (`lifecycle`): one guarded operation per legal
//!   status transition, backed by compare-and-swap conditional updates
//! - **Database** (`db`): embedded SurrealDB storage with per-table
//!   repositories
//! - **Event hub** (`events`): process-wide status-changed fan-out with
//!   deduplicated named registration
//! - **HTTP API** (`api`): RESTful interface per resource
//!
//! # Module structure
//!
//! ```text
//! backoffice-server/src/
//! ├── core/          # Config, state, server, errors
//! ├── db/            # Models and repositories (SurrealDB)
//! ├── lifecycle/     # Transition operations (CAS + validation + events)
//! ├── events/        # Status-changed event hub
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging and error re-exports
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod events;
pub mod lifecycle;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use events::EventHub;
pub use lifecycle::LifecycleController;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Prepare the process environment: dotenv, work directory, logging
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.to_str(),
    );

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____             __      ____  _________
   / __ )____ ______/ /__   / __ \/ __/ __(_)_______
  / __  / __ `/ ___/ //_/  / / / / /_/ /_/ / ___/ _ \
 / /_/ / /_/ / /__/ ,<    / /_/ / __/ __/ / /__/  __/
/_____/\__,_/\___/_/|_|   \____/_/ /_/ /_/\___/\___/
    "#
    );
}
