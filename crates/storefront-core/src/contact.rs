//! # Contact Form
//!
//! Validation and construction of contact-form submissions.
//!
//! ```text
//! ContactSubmission { email, subject, message }
//!        │
//!        ▼  validate()  → 400-style ValidationError on bad input
//!        │
//!        ▼
//! Contact { id, email, subject, message, createdAt }  → stored by the db layer
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::validation::{
    validate_email, validate_max_len, validate_required, ValidationResult, MAX_MESSAGE_LEN,
    MAX_SUBJECT_LEN,
};

/// What the visitor typed into the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    /// Checks all three fields.
    ///
    /// ## Rules
    /// - email, subject and message are required
    /// - email must look like an address
    /// - subject ≤ 200 characters, message ≤ 5000 characters
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.email)?;
        validate_required("subject", &self.subject)?;
        validate_max_len("subject", self.subject.trim(), MAX_SUBJECT_LEN)?;
        validate_required("message", &self.message)?;
        validate_max_len("message", self.message.trim(), MAX_MESSAGE_LEN)
    }
}

/// An accepted contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Validates a submission and stamps it with a fresh id and the current
    /// time. Fields are stored trimmed.
    pub fn from_submission(submission: ContactSubmission) -> ValidationResult<Self> {
        Contact::with_id(Uuid::new_v4().to_string(), submission, Utc::now())
    }

    /// Like [`Contact::from_submission`] with an explicit id and timestamp.
    pub fn with_id(
        id: String,
        submission: ContactSubmission,
        created_at: DateTime<Utc>,
    ) -> ValidationResult<Self> {
        submission.validate()?;
        Ok(Contact {
            id,
            email: submission.email.trim().to_string(),
            subject: submission.subject.trim().to_string(),
            message: submission.message.trim().to_string(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn submission(email: &str, subject: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_submission_becomes_contact() {
        let contact = Contact::from_submission(submission(
            " ana@example.com ",
            "Encomenda de bolo",
            "Vocês fazem bolo para 30 pessoas?",
        ))
        .unwrap();

        assert_eq!(contact.email, "ana@example.com");
        assert_eq!(contact.subject, "Encomenda de bolo");
        assert!(Uuid::parse_str(&contact.id).is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = submission("", "Oi", "Olá").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "email".to_string()
            }
        );

        let err = submission("ana@example.com", "  ", "Olá").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "subject".to_string()
            }
        );

        let err = submission("ana@example.com", "Oi", "").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "message".to_string()
            }
        );
    }

    #[test]
    fn test_overlong_message_rejected() {
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        let err = submission("ana@example.com", "Oi", &long).validate().unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }

    #[test]
    fn test_missing_json_fields_default_to_empty() {
        let parsed: ContactSubmission = serde_json::from_str(r#"{"email":"ana@example.com"}"#).unwrap();
        assert!(parsed.validate().is_err());
    }
}
