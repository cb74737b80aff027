/// Fjall-based persistence layer for vouchers
///
/// The store is append-only: vouchers are inserted, listed and looked up, but
/// never updated or deleted. It uses Fjall (an embedded LSM key-value store)
/// to persist:
///
/// - Voucher summaries (date, id, rounded debit/credit totals)
/// - Raw documents (the submitted JSON text, verbatim)
/// - A natural-key index on `(date, id)`
/// - Metadata (the next row id)
///
/// ## Row ids
///
/// Every insert is assigned a [`RowId`] starting at 1. Ids increase
/// monotonically and are never reused, even when a write fails after the id
/// was taken.
///
/// ## Duplicate natural keys
///
/// `(date, id)` is not unique unless `reject_duplicate_keys` is set.
/// [`VoucherStore::lookup_raw_text`] returns the earliest match and logs a
/// warning when there are several; [`VoucherStore::lookup_all`] and
/// [`VoucherStore::raw_text_by_row`] let callers disambiguate.
///
/// ## Usage
///
/// ```rust,ignore
/// use voucherbox::ledger::{StoreOptions, VoucherStore};
///
/// let store = VoucherStore::open("data/vouchers", StoreOptions::default())?;
/// let row_id = store.insert(&voucher)?;
/// let listing = store.list_summaries()?;
/// let text = store.lookup_raw_text("2024-01-01", "V1")?;
/// ```

pub mod error;
pub mod models;
pub mod partitions;
pub mod store;

pub use error::{LedgerError, Result};
pub use models::{GrandTotals, ListItem, Listing, RowId, SummaryRow, VoucherRecord};
pub use store::{StoreOptions, StoreStats, VoucherStore};
