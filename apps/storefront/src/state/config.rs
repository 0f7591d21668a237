//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Defaults (this file)
//!
//! | Variable                | Meaning                              | Default                  |
//! |-------------------------|--------------------------------------|--------------------------|
//! | `STOREFRONT_DB_PATH`    | SQLite file                          | platform data dir        |
//! | `STOREFRONT_DISCOUNTS`  | JSON file with the discount rules    | built-in rules           |
//! | `STOREFRONT_STORE_NAME` | Name shown in listings               | `Storefront Bakery`      |
//!
//! Read-only after initialization, so no lock is needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use storefront_core::RuleSet;

pub const DB_PATH_VAR: &str = "STOREFRONT_DB_PATH";
pub const DISCOUNTS_VAR: &str = "STOREFRONT_DISCOUNTS";
pub const STORE_NAME_VAR: &str = "STOREFRONT_STORE_NAME";

const DEFAULT_STORE_NAME: &str = "Storefront Bakery";
const DATABASE_FILE: &str = "storefront.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Store name (shown in listings)
    pub store_name: String,

    /// Explicit database file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// JSON rule file. `None` means the built-in rules.
    pub discounts_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: DEFAULT_STORE_NAME.to_string(),
            database_path: None,
            discounts_path: None,
        }
    }
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables and defaults.
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(store_name) = var(STORE_NAME_VAR) {
            config.store_name = store_name;
        }

        config.database_path = var(DB_PATH_VAR).map(PathBuf::from);
        config.discounts_path = var(DISCOUNTS_VAR).map(PathBuf::from);

        config
    }

    /// Determines the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.storefront.bakery/storefront.db`
    /// - **Windows**: `%APPDATA%\storefront\bakery\data\storefront.db`
    /// - **Linux**: `~/.local/share/bakery/storefront.db`
    ///
    /// The data directory is created if missing.
    pub fn resolve_database_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "storefront", "bakery")
            .ok_or_else(|| ApiError::config("Could not determine app data directory"))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            ApiError::config(format!(
                "Could not create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Loads the discount rules for this run.
    ///
    /// A bad rule file is a startup error, not something to fall back from.
    pub fn load_rules(&self) -> Result<RuleSet, ApiError> {
        match &self.discounts_path {
            Some(path) => load_rule_file(path),
            None => {
                debug!("Using built-in discount rules");
                Ok(RuleSet::active())
            }
        }
    }
}

fn load_rule_file(path: &Path) -> Result<RuleSet, ApiError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        ApiError::config(format!(
            "Could not read discount rules {}: {}",
            path.display(),
            e
        ))
    })?;

    let rules = RuleSet::from_json(&json).map_err(|e| {
        ApiError::config(format!(
            "Invalid discount rules {}: {}",
            path.display(),
            e
        ))
    })?;
    info!(path = %path.display(), rules = rules.len(), "Loaded discount rules");
    Ok(rules)
}
