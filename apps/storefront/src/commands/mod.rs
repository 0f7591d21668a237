//! # Commands Module
//!
//! Every operation the storefront exposes. Commands are plain functions
//! that borrow only the state they need and return serializable values or
//! [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Product listing with discount preview
//! ├── cart.rs     ◄─── Cart manipulation
//! ├── contact.rs  ◄─── Contact form
//! ├── admin.rs    ◄─── Session gate, logout
//! └── config.rs   ◄─── Effective configuration
//! ```
//!
//! ## State Injection
//! ```rust,ignore
//! // Only needs the catalog and rules
//! commands::catalog::list_products(&catalog, cart.rules(), None)
//!
//! // Needs the cart and the catalog
//! commands::cart::add_to_cart(&cart, &catalog, id, Some(2))?
//!
//! // Needs the database
//! commands::contact::submit_contact(db.inner(), submission).await?
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod contact;
