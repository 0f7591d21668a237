//! # Storefront Database
//!
//! Opens the SQLite file that holds the persisted cart and the contact
//! messages, and hands out repositories over it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App::start                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(DbConfig::new(path))                                     │
//! │       │  file created if missing, WAL journal, migrations applied       │
//! │       ▼                                                                 │
//! │  db.kv() ──────► cart writer task (key "cart")                          │
//! │  db.contacts() ► contact form                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  App::shutdown: cart flushed, then db.close()                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storefront is a single process with one writer task, so the pool
//! stays small. An in-memory database lives inside one connection and must
//! never get a second.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::contact::ContactRepository;
use crate::repository::kv::KvRepository;

const IN_MEMORY: &str = ":memory:";

/// Connections for a file database: commands plus the cart writer.
const FILE_POOL_SIZE: u32 = 4;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Configuration
// =============================================================================

/// Where the storefront database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// SQLite file, or `:memory:` for a private throwaway database.
    pub database_path: PathBuf,

    /// Apply pending migrations when connecting. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file database at `path`, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            run_migrations: true,
        }
    }

    /// A private in-memory database. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig::new(IN_MEMORY)
    }

    /// Sets whether to apply migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            FILE_POOL_SIZE
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());
        let journal = if self.is_in_memory() {
            SqliteJournalMode::Memory
        } else {
            SqliteJournalMode::Wal
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(journal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);
        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the storefront database. Clones share one pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./storefront.db")).await?;
/// db.kv().set("cart", "[]").await?;
/// let recent = db.contacts().list(20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless disabled, applies pending migrations.
    ///
    /// ## Errors
    /// - `ConnectionFailed` when the file cannot be opened or created
    /// - `MigrationFailed` when a migration does not apply
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening storefront database");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size())
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(connections = config.pool_size(), "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call more than once.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Key-value store backing the persisted cart.
    pub fn kv(&self) -> KvRepository {
        KvRepository::new(self.pool.clone())
    }

    pub fn contacts(&self) -> ContactRepository {
        ContactRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later queries fail with `Closed`.
    pub async fn close(&self) {
        info!("Closing storefront database");
        self.pool.close().await;
    }

    /// Whether a trivial query still succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_follows_location() {
        assert!(DbConfig::in_memory().is_in_memory());
        assert_eq!(DbConfig::in_memory().pool_size(), 1);

        let file = DbConfig::new("/tmp/shop.db").run_migrations(false);
        assert!(!file.is_in_memory());
        assert!(!file.run_migrations);
        assert_eq!(file.pool_size(), FILE_POOL_SIZE);
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.kv().set("greeting", "\"olá\"").await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            reopened.kv().get("greeting").await.unwrap().as_deref(),
            Some("\"olá\"")
        );
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
        assert!(db.kv().get("cart").await.is_err());
    }
}
