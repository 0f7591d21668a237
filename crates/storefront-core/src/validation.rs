//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Configuration load                                           │
//! │  ├── Catalog products (ids, names, prices)                             │
//! │  └── Discount rules (value ranges, targets)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands                                                     │
//! │  ├── Cart quantities                                                   │
//! │  └── Contact form fields                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / PRIMARY KEY constraints                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_email("cliente@padaria.com.br").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{AppliedDiscount, DiscountRule, DiscountType, Product};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a contact subject.
pub const MAX_SUBJECT_LEN: usize = 200;

/// Maximum length of a contact message.
pub const MAX_MESSAGE_LEN: usize = 5000;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a field is present after trimming whitespace.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks that a field is at most `max` characters.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name)?;
    validate_max_len("name", name.trim(), 200)
}

/// Validates an email address loosely.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@`, with text on both sides
/// - Domain contains a `.` that is not at either end
/// - No whitespace
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana.example.com").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;
    validate_max_len("email", email, 254)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  User picks quantity: 5                                                 │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_to_cart                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(490).is_ok());
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a catalog product.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("id", &product.id)?;
    validate_product_name(&product.name)?;
    validate_price_cents(product.price_cents)
}

/// Validates a discount snapshot read back from storage.
///
/// ## Rules
/// - No amount is negative
/// - The final price never exceeds the original price
pub fn validate_applied_discount(discount: &AppliedDiscount) -> ValidationResult<()> {
    validate_price_cents(discount.original_price.cents())?;
    validate_price_cents(discount.final_price.cents())?;
    if discount.discount_amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "discount amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    if discount.final_price > discount.original_price {
        return Err(ValidationError::InvalidFormat {
            field: "discount".to_string(),
            reason: "final price exceeds original price".to_string(),
        });
    }
    Ok(())
}

/// Validates a discount rule.
///
/// ## Rules
/// - Percentage value is a percent, 0..=100, fractions allowed
/// - Fixed value is a whole, non-negative number of centavos
/// - `applyTo` names at least one category or product id; an empty target
///   would never match anything
pub fn validate_discount_rule(rule: &DiscountRule) -> ValidationResult<()> {
    match rule.discount_type {
        DiscountType::Percentage => {
            if !(0.0..=100.0).contains(&rule.value) {
                return Err(ValidationError::OutOfRange {
                    field: "discount value".to_string(),
                    min: 0,
                    max: 100,
                });
            }
        }
        DiscountType::Fixed => {
            if !(rule.value >= 0.0 && rule.value <= i64::MAX as f64) {
                return Err(ValidationError::OutOfRange {
                    field: "discount value".to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
            if rule.value.fract() != 0.0 {
                return Err(ValidationError::InvalidFormat {
                    field: "discount value".to_string(),
                    reason: "fixed discounts are whole centavos".to_string(),
                });
            }
        }
    }

    if rule.apply_to.is_empty() {
        return Err(ValidationError::Required {
            field: "applyTo".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
