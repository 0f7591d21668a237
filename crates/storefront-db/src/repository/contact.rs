//! # Contact Repository
//!
//! Storage for accepted contact-form messages. Validation happens in
//! `storefront_core::contact` before anything reaches this layer.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use storefront_core::Contact;

/// Repository for contact-form submissions.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    /// Creates a new ContactRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ContactRepository { pool }
    }

    /// Stores a validated contact.
    ///
    /// ## Errors
    /// [`crate::DbError::Duplicate`] if the id is already taken.
    pub async fn insert(&self, contact: &Contact) -> DbResult<()> {
        debug!(id = %contact.id, "Inserting contact");

        sqlx::query(
            r#"
            INSERT INTO contacts (id, email, subject, message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&contact.id)
        .bind(&contact.email)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %contact.id, "Contact message stored");
        Ok(())
    }

    /// Fetches a contact by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Contact>> {
        let row = sqlx::query(
            "SELECT id, email, subject, message, created_at FROM contacts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| contact_from_row(&r)).transpose()
    }

    /// Lists the most recent contacts, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Contact>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, subject, message, created_at
            FROM contacts
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contact_from_row).collect()
    }

    /// Counts stored contacts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn contact_from_row(row: &SqliteRow) -> DbResult<Contact> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Contact {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        created_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use storefront_core::ContactSubmission;

    fn contact(id: &str, subject: &str, minute: u32) -> Contact {
        let submission = ContactSubmission {
            email: "cliente@example.com".to_string(),
            subject: subject.to_string(),
            message: "Vocês abrem no domingo?".to_string(),
        };
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap();
        Contact::with_id(id.to_string(), submission, created_at).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.contacts();

        let stored = contact("c-1", "Horário", 0);
        repo.insert(&stored).await.unwrap();

        assert_eq!(repo.get_by_id("c-1").await.unwrap(), Some(stored));
        assert_eq!(repo.get_by_id("c-2").await.unwrap(), None);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.contacts();

        repo.insert(&contact("old", "Primeira", 1)).await.unwrap();
        repo.insert(&contact("new", "Segunda", 30)).await.unwrap();

        let listed = repo.list(10).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        assert_eq!(repo.list(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.contacts();

        repo.insert(&contact("dup", "A", 0)).await.unwrap();
        let err = repo.insert(&contact("dup", "B", 1)).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate { .. }));
    }
}
