use crate::humanize::ByteSize;
use crate::voucher::FieldNames;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub fields: FieldNames,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Voucher store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Fsync the journal after every insert
    #[serde(default = "default_sync_on_insert")]
    pub sync_on_insert: bool,
    /// Enforce a unique `(date, id)` natural key at insert time
    #[serde(default)]
    pub reject_duplicate_keys: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            sync_on_insert: default_sync_on_insert(),
            reject_duplicate_keys: false,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/vouchers")
}

fn default_sync_on_insert() -> bool {
    true
}

/// Document validation settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Reject documents without the date or id field
    #[serde(default)]
    pub require_header_fields: bool,
    /// Upper bound on submitted document size; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_document_bytes: Option<ByteSize>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.store.path, PathBuf::from("data/vouchers"));
        assert!(config.store.sync_on_insert);
        assert!(!config.store.reject_duplicate_keys);
        assert_eq!(config.fields, FieldNames::default());
        assert!(config.validation.max_document_bytes.is_none());
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[store]
reject_duplicate_keys = true

[validation]
max_document_bytes = "256KB"
            "#,
        )
        .unwrap();

        assert!(config.store.reject_duplicate_keys);
        assert!(config.store.sync_on_insert);
        assert_eq!(
            config.validation.max_document_bytes,
            Some(ByteSize(256 * 1024))
        );
        assert_eq!(config.fields.lines, "科目明细");
    }
}
