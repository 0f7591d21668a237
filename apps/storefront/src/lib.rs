//! # Storefront Library
//!
//! Composition root for the storefront: builds the state, dispatches CLI
//! commands and shuts down cleanly.
//!
//! ## Module Organization
//! ```text
//! storefront_lib/
//! ├── lib.rs          ◄─── You are here (App setup & dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart store (observers + write-through)
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Product listing
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── contact.rs  ◄─── Contact form
//! │   ├── admin.rs    ◄─── Session gate
//! │   └── config.rs   ◄─── Effective configuration
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{CartCommand, Command};
use error::ApiError;
use state::{AppConfig, CartStore, DbState};
use storefront_core::{Catalog, ContactSubmission};

/// Everything a command may need, created once per process.
#[derive(Debug)]
pub struct App {
    pub config: AppConfig,
    pub db: DbState,
    pub cart: CartStore,
    pub catalog: Catalog,
}

impl App {
    /// Builds the application state.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Application Startup                               │
    /// │                                                                         │
    /// │  1. Load Discount Rules ──────────────────────────────────────────────► │
    /// │     • STOREFRONT_DISCOUNTS file, else built-in rules                    │
    /// │     • Unknown discount type or invalid rule: startup fails              │
    /// │                                                                         │
    /// │  2. Connect to Database ──────────────────────────────────────────────► │
    /// │     • STOREFRONT_DB_PATH, else platform data directory                  │
    /// │     • SQLite with WAL mode, pending migrations applied                  │
    /// │                                                                         │
    /// │  3. Restore Cart ─────────────────────────────────────────────────────► │
    /// │     • Key "cart" read once; missing or unreadable gives an empty cart   │
    /// │     • Writer task spawned for write-through persistence                 │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn start(config: AppConfig) -> Result<Self, ApiError> {
        let rules = config.load_rules()?;
        let db = DbState::open(&config).await?;
        let cart = CartStore::restore(db.inner().kv(), rules).await;

        info!(store = %config.store_name, "Storefront ready");

        Ok(App {
            config,
            db,
            cart,
            catalog: Catalog::builtin(),
        })
    }

    /// Runs one command and returns its JSON result.
    pub async fn execute(&self, command: Command) -> Result<Value, ApiError> {
        use commands::{admin, cart, catalog, config, contact};

        match command {
            Command::Catalog(args) => to_json(catalog::list_products(
                &self.catalog,
                self.cart.rules(),
                args.category,
            )),
            Command::Product { id } => {
                to_json(catalog::get_product(&self.catalog, self.cart.rules(), &id)?)
            }
            Command::Cart(cart_command) => match cart_command {
                CartCommand::Show => to_json(cart::get_cart(&self.cart)),
                CartCommand::Add { id, quantity } => {
                    to_json(cart::add_to_cart(&self.cart, &self.catalog, &id, quantity)?)
                }
                CartCommand::Remove { id } => to_json(cart::remove_from_cart(&self.cart, &id)),
                CartCommand::Increase { id } => to_json(cart::increase_quantity(&self.cart, &id)?),
                CartCommand::Decrease { id } => to_json(cart::decrease_quantity(&self.cart, &id)),
                CartCommand::Clear => to_json(cart::clear_cart(&self.cart)),
            },
            Command::Contact(args) => {
                let submission = ContactSubmission {
                    email: args.email,
                    subject: args.subject,
                    message: args.message,
                };
                to_json(contact::submit_contact(self.db.inner(), submission).await?)
            }
            Command::Contacts { limit } => {
                to_json(contact::list_contacts(self.db.inner(), limit).await?)
            }
            Command::Gate(args) => to_json(admin::check_access(&args.path, args.session.as_deref())),
            Command::Logout => to_json(admin::logout()),
            Command::Config => to_json(config::get_config(&self.config, self.cart.rules())),
        }
    }

    /// Waits for pending cart writes, then closes the database.
    pub async fn shutdown(self) {
        self.cart.flush().await;
        self.db.close().await;
        info!("Storefront shut down");
    }
}

/// Runs a single CLI invocation: start, execute, flush, close.
pub async fn run(command: Command) -> Result<Value, ApiError> {
    let app = App::start(AppConfig::from_env()).await?;
    let result = app.execute(command).await;
    app.shutdown().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for storefront crates only
/// - Default: `info,storefront=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}
