//! # Key-Value Repository
//!
//! Persistent string-keyed storage for client state. The cart is stored
//! here under the key `"cart"` as a JSON array of cart items.
//!
//! ## Contract
//! ```text
//! get(key)        → Some(value) | None
//! set(key, value) → upsert, last write wins
//! delete(key)     → removes the entry (no-op when absent)
//! clear()         → removes every entry
//! keys()          → all stored keys, sorted
//! ```
//!
//! Values are opaque text at this layer; [`KvRepository::get_json`] and
//! [`KvRepository::set_json`] add serde encoding on top.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository over the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes `key`.
    ///
    /// ## Returns
    /// `true` when an entry existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Deleting key");

        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every entry.
    ///
    /// ## Returns
    /// Number of deleted entries.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await?;

        debug!(removed = result.rows_affected(), "Cleared key-value store");
        Ok(result.rows_affected())
    }

    /// Lists all stored keys in ascending order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }

    /// Reads and decodes a JSON value.
    ///
    /// A stored value that does not decode as `T` is an error
    /// ([`crate::DbError::Serialization`]), not `None`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> KvRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().kv()
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let kv = repo().await;
        assert_eq!(kv.get("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let kv = repo().await;

        kv.set("cart", "[]").await.unwrap();
        kv.set("cart", r#"[{"quantity":1}]"#).await.unwrap();

        assert_eq!(
            kv.get("cart").await.unwrap().as_deref(),
            Some(r#"[{"quantity":1}]"#)
        );
        assert_eq!(kv.keys().await.unwrap(), vec!["cart".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let kv = repo().await;

        kv.set("b", "2").await.unwrap();
        kv.set("a", "1").await.unwrap();
        assert_eq!(kv.keys().await.unwrap(), vec!["a", "b"]);

        assert!(kv.delete("a").await.unwrap());
        assert!(!kv.delete("a").await.unwrap());
        assert_eq!(kv.get("a").await.unwrap(), None);

        assert_eq!(kv.clear().await.unwrap(), 1);
        assert!(kv.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let kv = repo().await;

        kv.set_json("numbers", &vec![1_i64, 2, 3]).await.unwrap();
        let numbers: Option<Vec<i64>> = kv.get_json("numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i64>> = kv.get_json("nothing").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_corrupt_json_is_serialization_error() {
        let kv = repo().await;
        kv.set("cart", "{not json").await.unwrap();

        let err = kv.get_json::<Vec<i64>>("cart").await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }
}
