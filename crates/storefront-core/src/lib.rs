//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate contains the catalog, the discount engine and the cart model
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                apps/storefront (composition root)               │   │
//! │  │     CartStore ──► commands ──► CLI                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │ discount  │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │ RuleSet   │  │   Cart    │  │  contact  │  │   │
//! │  │   │  Category │  │ evaluate  │  │ CartItem  │  │  access   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                storefront-db (Database Layer)                   │   │
//! │  │              SQLite key-value store, contacts                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, DiscountRule, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - The built-in product catalog
//! - [`discount`] - Discount evaluation and rule sets
//! - [`cart`] - Cart model and its transitions
//! - [`contact`] - Contact form submissions
//! - [`access`] - Session gate for admin paths
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Catalog, RuleSet};
//!
//! let catalog = Catalog::builtin();
//! let rules = RuleSet::active();
//!
//! let mut cart = Cart::new();
//! let bread = catalog.get("550e8400-e29b-41d4-a716-446655440000").unwrap();
//! cart.add(bread, 2, &rules).unwrap();
//!
//! // R$ 4,90 with 15% off BREAD = R$ 4,16 (rounded) per unit
//! assert_eq!(cart.total().cents(), 832);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{authorize, Access};
pub use cart::{Cart, CartItem};
pub use catalog::Catalog;
pub use contact::{Contact, ContactSubmission};
pub use discount::{evaluate, RuleSet};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single item in cart.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Storage key under which the cart snapshot is persisted.
pub const CART_STORAGE_KEY: &str = "cart";
