//! # Database Errors
//!
//! Everything the storefront database can fail with. The cart writer logs
//! these and carries on; commands turn them into `DATABASE_ERROR`
//! responses without leaking SQL.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or created.
    #[error("Could not open database: {0}")]
    ConnectionFailed(String),

    /// The pool was closed, normally during shutdown.
    #[error("Database is closed")]
    Closed,

    /// Every connection stayed busy past the acquire timeout.
    #[error("Timed out waiting for a database connection")]
    Busy,

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A UNIQUE constraint rejected the write, e.g. a reused contact id.
    #[error("Duplicate value for {constraint}")]
    Duplicate { constraint: String },

    /// A stored JSON value does not fit the type it was read as.
    ///
    /// Seen when the persisted cart was edited by hand or written by an
    /// incompatible build.
    #[error("Stored value is unreadable: {0}")]
    Serialization(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => DbError::Closed,
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                // SQLite reports "UNIQUE constraint failed: contacts.id"
                let constraint = db_err
                    .message()
                    .rsplit(": ")
                    .next()
                    .unwrap_or_default()
                    .to_string();
                DbError::Duplicate { constraint }
            }
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}
