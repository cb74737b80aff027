//! In-process facade used by presentation layers.
//!
//! `submit` validates and stores a document, `refresh` lists summaries with the
//! grand total, `open` returns the stored document for a `(date, id)` pair.
//! Validation failures are reported before the store is touched.

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::ledger::{LedgerError, Listing, RowId, StoreStats, VoucherRecord, VoucherStore};
use crate::observability::{Metrics, MetricsSnapshot};
use crate::voucher::{ValidationError, Validator};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no voucher stored under date '{date}' and id '{id}'")]
    NotFound { date: String, id: String },

    #[error("no voucher stored with row id {0}")]
    RowNotFound(u64),

    #[error("a voucher with date '{date}' and id '{id}' is already stored")]
    DuplicateKey { date: String, id: String },

    /// The voucher is stored and listed but the journal sync failed
    #[error("voucher stored as row {row_id} but not yet durable: {source}")]
    NotDurable {
        row_id: RowId,
        #[source]
        source: fjall::Error,
    },

    #[error("grand {0} total exceeds the decimal range")]
    TotalOverflow(&'static str),

    #[error("voucher store unavailable: {0}")]
    StoreUnavailable(#[source] LedgerError),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { date, id } => EngineError::NotFound { date, id },
            LedgerError::RowNotFound(row) => EngineError::RowNotFound(row),
            LedgerError::DuplicateKey { date, id } => EngineError::DuplicateKey { date, id },
            LedgerError::NotDurable { row_id, source } => EngineError::NotDurable {
                row_id: RowId(row_id),
                source,
            },
            LedgerError::TotalOverflow(column) => EngineError::TotalOverflow(column),
            other => EngineError::StoreUnavailable(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Owns the store handle for the lifetime of a session
pub struct Engine {
    store: VoucherStore,
    validator: Validator,
    metrics: Metrics,
}

impl Engine {
    /// Open the store described by `config`
    pub fn start(config: &Config) -> Result<Self> {
        let store = VoucherStore::open(&config.store.path, config.store_options())?;
        Ok(Self::with_store(store, config.validator()))
    }

    pub fn with_store(store: VoucherStore, validator: Validator) -> Self {
        Self {
            store,
            validator,
            metrics: Metrics::new(),
        }
    }

    /// Validate `text` and append it to the store
    pub fn submit(&self, text: &str) -> Result<RowId> {
        let voucher = match self.validator.validate(text) {
            Ok(voucher) => voucher,
            Err(err) => {
                self.metrics.voucher_rejected();
                warn!(error = %err, "Voucher rejected");
                return Err(err.into());
            }
        };

        let row_id = self.store.insert(&voucher).inspect_err(|err| match err {
            LedgerError::NotDurable { .. } => self.metrics.voucher_accepted(),
            _ => {
                self.metrics.voucher_rejected();
                warn!(error = %err, "Voucher could not be stored");
            }
        })?;

        self.metrics.voucher_accepted();
        Ok(row_id)
    }

    /// Current summaries plus the grand total, recomputed from the store
    pub fn refresh(&self) -> Result<Listing> {
        Ok(self.store.list_summaries()?)
    }

    /// Stored text for `(date, id)`; the earliest voucher wins on duplicates
    pub fn open(&self, date: &str, id: &str) -> Result<String> {
        self.metrics.lookup();
        Ok(self.store.lookup_raw_text(date, id)?)
    }

    /// Every voucher stored under `(date, id)`
    pub fn open_all(&self, date: &str, id: &str) -> Result<Vec<VoucherRecord>> {
        self.metrics.lookup();
        Ok(self.store.lookup_all(date, id)?)
    }

    pub fn open_row(&self, row_id: RowId) -> Result<String> {
        self.metrics.lookup();
        Ok(self.store.raw_text_by_row(row_id)?)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        Ok(self.store.stats()?)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Flush and release the store
    pub fn close(self) -> Result<()> {
        let metrics = self.metrics.snapshot();
        self.store.close()?;
        info!(
            accepted = metrics.vouchers_accepted,
            rejected = metrics.vouchers_rejected,
            lookups = metrics.lookups,
            "Engine closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StoreOptions;
    use crate::voucher::FieldNames;
    use tempfile::TempDir;

    fn create_test_engine() -> (Engine, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store =
            VoucherStore::open(temp_dir.path().join("engine"), StoreOptions::default()).unwrap();
        (
            Engine::with_store(store, Validator::new(FieldNames::default())),
            temp_dir,
        )
    }

    #[test]
    fn test_ledger_errors_map_to_engine_errors() {
        let err: EngineError = LedgerError::NotFound {
            date: "d".to_string(),
            id: "i".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let err: EngineError = LedgerError::Corrupt("bad".to_string()).into();
        assert!(matches!(err, EngineError::StoreUnavailable(_)));

        let err: EngineError =
            LedgerError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
                .into();
        assert!(matches!(err, EngineError::StoreUnavailable(_)));

        let err: EngineError = LedgerError::TotalOverflow("debit").into();
        assert!(matches!(err, EngineError::TotalOverflow("debit")));
    }

    #[test]
    fn test_unsynced_commit_keeps_its_row_id() {
        let err: EngineError = LedgerError::NotDurable {
            row_id: 7,
            source: fjall::Error::Poisoned,
        }
        .into();

        match err {
            EngineError::NotDurable { row_id, source } => {
                assert_eq!(row_id, RowId(7));
                assert!(matches!(source, fjall::Error::Poisoned));
            }
            other => panic!("expected NotDurable, got {other:?}"),
        }
    }

    #[test]
    fn test_rejected_submission_counts() {
        let (engine, _temp) = create_test_engine();

        assert!(engine.submit("not json").is_err());
        engine.submit(r#"{"科目明细":[]}"#).unwrap();

        let metrics = engine.metrics();
        assert_eq!(metrics.vouchers_rejected, 1);
        assert_eq!(metrics.vouchers_accepted, 1);
    }

    #[test]
    fn test_open_row() {
        let (engine, _temp) = create_test_engine();
        let text = r#"{"凭证日期":"2024-03-01","凭证编号":"X","科目明细":[]}"#;

        let row_id = engine.submit(text).unwrap();
        assert_eq!(engine.open_row(row_id).unwrap(), text);
        assert!(matches!(
            engine.open_row(RowId(404)),
            Err(EngineError::RowNotFound(404))
        ));
    }
}
