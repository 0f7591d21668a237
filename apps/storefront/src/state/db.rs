//! # Database State
//!
//! Opens the storefront database for the configured path.
//!
//! ## Thread Safety
//! The `Database` from `storefront-db` wraps a `SqlitePool`, which is
//! thread-safe. Commands and the cart writer task share it freely.

use tracing::info;

use crate::error::ApiError;
use crate::state::AppConfig;
use storefront_db::{Database, DbConfig};

/// Wrapper around `Database` owned by the composition root.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Wraps an already-open database.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Resolves the database path from `config`, connects and migrates.
    pub async fn open(config: &AppConfig) -> Result<Self, ApiError> {
        let path = config.resolve_database_path()?;
        info!(path = %path.display(), "Database path determined");

        let db = Database::new(DbConfig::new(path)).await?;
        info!("Database connected and migrations applied");

        Ok(DbState::new(db))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Closes the pool. Flush the cart store first.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
