//! Configuration management for voucherbox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use voucherbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Vouchers stored at: {}", config.store.path.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `VOUCHERBOX__<section>__<key>`
//!
//! Examples:
//! - `VOUCHERBOX__STORE__PATH=/var/lib/voucherbox`
//! - `VOUCHERBOX__STORE__REJECT_DUPLICATE_KEYS=true`
//! - `VOUCHERBOX__VALIDATION__MAX_DOCUMENT_BYTES=1MB`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/voucherbox.toml`.
//! This can be overridden using the `VOUCHERBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use crate::voucher::FieldNames;
pub use models::{Config, StoreConfig, TelemetryConfig, ValidationConfig};
pub use validation::ValidationError;

use crate::ledger::StoreOptions;
use crate::voucher::Validator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`VOUCHERBOX__*`)
    /// 2. TOML file (default: `config/voucherbox.toml`)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Store write options derived from the `[store]` section
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            sync_on_insert: self.store.sync_on_insert,
            reject_duplicate_keys: self.store.reject_duplicate_keys,
        }
    }

    /// Document validator built from `[fields]` and `[validation]`
    pub fn validator(&self) -> Validator {
        Validator::new(self.fields.clone())
            .require_header_fields(self.validation.require_header_fields)
            .max_document_bytes(self.validation.max_document_bytes.map(|b| b.as_u64()))
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
