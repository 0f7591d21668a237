//! # Contact Commands
//!
//! Accepts contact-form submissions and lists the stored ones.
//!
//! ```text
//! submit_contact(submission)
//!       │
//!       ├── invalid? ──► ApiError VALIDATION_ERROR (nothing stored)
//!       │
//!       ▼
//! Contact::from_submission ──► db.contacts().insert ──► Contact
//! ```

use tracing::{debug, info};

use crate::error::ApiError;
use storefront_core::{Contact, ContactSubmission};
use storefront_db::Database;

/// Default number of contacts returned by [`list_contacts`].
pub const DEFAULT_CONTACT_LIMIT: u32 = 50;

/// Validates and stores a contact-form submission.
pub async fn submit_contact(
    db: &Database,
    submission: ContactSubmission,
) -> Result<Contact, ApiError> {
    debug!("submit_contact command");

    let contact = Contact::from_submission(submission)?;
    db.contacts().insert(&contact).await?;

    info!(id = %contact.id, "Contact form submitted");
    Ok(contact)
}

/// Lists stored contacts, newest first.
pub async fn list_contacts(db: &Database, limit: Option<u32>) -> Result<Vec<Contact>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_CONTACT_LIMIT);
    debug!(limit = limit, "list_contacts command");

    Ok(db.contacts().list(limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use storefront_db::DbConfig;

    fn submission(email: &str) -> ContactSubmission {
        ContactSubmission {
            email: email.to_string(),
            subject: "Encomenda".to_string(),
            message: "Gostaria de encomendar um bolo.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let stored = submit_contact(&db, submission("ana@example.com")).await.unwrap();
        assert_eq!(stored.email, "ana@example.com");

        let listed = list_contacts(&db, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);
        assert_eq!(listed[0].subject, "Encomenda");
    }

    #[tokio::test]
    async fn test_invalid_submission_is_not_stored() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = submit_contact(&db, submission("not-an-email")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.contacts().count().await.unwrap(), 0);
    }
}
