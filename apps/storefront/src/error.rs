//! # Command Errors
//!
//! `ApiError` is what a failed command prints: a stable code plus a message
//! safe to show a shopper.
//!
//! ```text
//! CoreError ──────┐
//! ValidationError ┼──► ApiError { code, message } ──► stdout JSON, exit 1
//! DbError ────────┘         (SQL details only go to the log)
//! ```
//!
//! Cart persistence failures never reach this type; the cart store logs
//! and swallows them.

use serde::Serialize;
use std::fmt;
use storefront_core::{CoreError, ValidationError};
use storefront_db::DbError;
use tracing::error;

/// A failed command.
///
/// ```json
/// { "code": "CART_ERROR", "message": "Quantity 1000 exceeds maximum allowed (999)" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id
    NotFound,

    /// Contact form or quantity input rejected
    ValidationError,

    /// Storage failed; details are logged, not returned
    DatabaseError,

    /// Quantity cap reached
    CartError,

    /// Startup configuration is unusable (rule file, data dir)
    ConfigError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn database(message: &str) -> Self {
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "Database error in command");

        match err {
            DbError::Duplicate { .. } => ApiError::validation("This entry was already submitted"),
            DbError::ConnectionFailed(_) | DbError::Closed => {
                ApiError::database("The store database is unavailable")
            }
            DbError::Busy => ApiError::database("The store database is busy, try again"),
            DbError::MigrationFailed(_) => ApiError::database("The store database could not be upgraded"),
            DbError::Serialization(_) => ApiError::database("Stored data is unreadable"),
            DbError::QueryFailed(_) => ApiError::database("Database operation failed"),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::UnsupportedDiscountType(_) => ApiError::config(err.to_string()),
            CoreError::QuantityTooLarge { .. } => ApiError::cart(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_value(ApiError::not_found("Product", "abc")).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: abc");
    }

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        }
        .into();
        assert_eq!(err.code, ErrorCode::CartError);
        assert!(err.message.contains("999"));

        let err: ApiError = CoreError::UnsupportedDiscountType("bogo".to_string()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.message.contains("bogo"));

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "email".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err: ApiError = DbError::QueryFailed("syntax error near SELEC".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELEC"));

        let err: ApiError = DbError::Duplicate {
            constraint: "contacts.id".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.message.contains("contacts.id"));
    }
}
