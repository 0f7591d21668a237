//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ```text
//! command / CartStore
//!       │
//!       │  db.kv().set_json("cart", &items)
//!       ▼
//! KvRepository ──► kv_store table
//! ContactRepository ──► contacts table
//! ```
//!
//! ## Available Repositories
//!
//! - [`KvRepository`] - String key to JSON value storage
//! - [`ContactRepository`] - Contact form submissions

pub mod contact;
pub mod kv;

pub use contact::ContactRepository;
pub use kv::KvRepository;
