//! # State Module
//!
//! Long-lived state created once at the composition root.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     run() in lib.rs                             │   │
//! │  │  let config = AppConfig::from_env();                            │   │
//! │  │  let db = DbState::open(&config).await?;                        │   │
//! │  │  let cart = CartStore::restore(db.inner().kv(), rules).await;   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │    CartStore     │  │    AppConfig     │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Mutex<Cart>     │  │  store_name      │          │
//! │  │  (SQLite     │  │  watch channels  │  │  database_path   │          │
//! │  │   pool)      │  │  writer task     │  │  discounts_path  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  Commands borrow only the state they need.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;

pub use cart::{CartSnapshot, CartStore, CartTotals};
pub use config::{AppConfig, DB_PATH_VAR, DISCOUNTS_VAR, STORE_NAME_VAR};
pub use db::DbState;
