use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use tracing::{debug, info, warn};

use crate::voucher::Voucher;

use super::error::{LedgerError, Result};
use super::models::{Listing, RowId, SummaryRow, VoucherRecord};
use super::partitions::{
    decode_natural_key_row, decode_row_key, encode_meta_key, encode_natural_key,
    encode_natural_prefix, encode_row_key,
};

const META_NEXT_ROW_ID: &str = "next_row_id";
const FIRST_ROW_ID: u64 = 1;
const INDEX_MARKER: &[u8] = b"";

/// Write behaviour of a [`VoucherStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Persist the journal with `SyncAll` before `insert` returns
    pub sync_on_insert: bool,
    /// Refuse to insert a second voucher with an existing `(date, id)`
    pub reject_duplicate_keys: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sync_on_insert: true,
            reject_duplicate_keys: false,
        }
    }
}

/// Fjall-backed append-only voucher storage
pub struct VoucherStore {
    keyspace: Keyspace,
    summaries: PartitionHandle,
    documents: PartitionHandle,
    natural_keys: PartitionHandle,
    metadata: PartitionHandle,
    next_row_id: AtomicU64,
    options: StoreOptions,
}

impl VoucherStore {
    /// Open or create a voucher store at the given path
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening voucher store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let summaries = keyspace.open_partition("summaries", PartitionCreateOptions::default())?;
        let documents = keyspace.open_partition("documents", PartitionCreateOptions::default())?;
        let natural_keys =
            keyspace.open_partition("natural_keys", PartitionCreateOptions::default())?;
        let metadata = keyspace.open_partition("metadata", PartitionCreateOptions::default())?;

        let next_row_id = match metadata.get(encode_meta_key(META_NEXT_ROW_ID))? {
            Some(bytes) => decode_row_key(&bytes)
                .ok_or_else(|| LedgerError::Corrupt(format!("{META_NEXT_ROW_ID} counter")))?
                .0,
            None => FIRST_ROW_ID,
        };

        info!(next_row_id, "Voucher store opened");
        Ok(Self {
            keyspace,
            summaries,
            documents,
            natural_keys,
            metadata,
            next_row_id: AtomicU64::new(next_row_id),
            options,
        })
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Append a validated voucher and return its row id
    ///
    /// Summary, document, index entry and the advanced counter are written in
    /// one batch, so a failed insert leaves nothing behind. The row id taken
    /// by a failed insert is skipped.
    ///
    /// If the batch commits but the journal sync fails, the voucher is already
    /// visible: `NotDurable` carries its row id so the caller does not retry
    /// the insert.
    pub fn insert(&self, voucher: &Voucher) -> Result<RowId> {
        if self.options.reject_duplicate_keys && self.contains_key(&voucher.date, &voucher.id)? {
            return Err(LedgerError::DuplicateKey {
                date: voucher.date.clone(),
                id: voucher.id.clone(),
            });
        }

        let row_id = RowId(self.next_row_id.fetch_add(1, Ordering::SeqCst));
        let summary = SummaryRow {
            row_id,
            date: voucher.date.clone(),
            id: voucher.id.clone(),
            debit_total: voucher.debit_total,
            credit_total: voucher.credit_total,
            stored_at: Utc::now(),
        };
        let value = serde_json::to_vec(&summary)?;

        let mut batch = self.keyspace.batch();
        batch.insert(&self.summaries, encode_row_key(row_id), value);
        batch.insert(&self.documents, encode_row_key(row_id), voucher.raw_text.as_bytes());
        batch.insert(
            &self.natural_keys,
            encode_natural_key(&voucher.date, &voucher.id, row_id),
            INDEX_MARKER,
        );
        batch.insert(
            &self.metadata,
            encode_meta_key(META_NEXT_ROW_ID),
            (row_id.0 + 1).to_be_bytes(),
        );
        batch.commit()?;

        if self.options.sync_on_insert {
            self.keyspace
                .persist(PersistMode::SyncAll)
                .map_err(|source| {
                    warn!(%row_id, error = %source, "Voucher committed but journal sync failed");
                    LedgerError::NotDurable {
                        row_id: row_id.0,
                        source,
                    }
                })?;
        }

        info!(
            %row_id,
            date = %voucher.date,
            id = %voucher.id,
            debit_total = %voucher.debit_total,
            credit_total = %voucher.credit_total,
            "Voucher stored"
        );
        Ok(row_id)
    }

    /// Every stored voucher in row-id order, followed by the grand total
    ///
    /// Totals are recomputed from storage on each call.
    pub fn list_summaries(&self) -> Result<Listing> {
        let mut rows = Vec::new();
        for item in self.summaries.iter() {
            let (_, value) = item?;
            rows.push(serde_json::from_slice::<SummaryRow>(&value)?);
        }

        let listing = Listing::from_rows(rows)?;
        debug!(vouchers = listing.len(), "Listed voucher summaries");
        Ok(listing)
    }

    /// Original text of the earliest voucher stored under `(date, id)`
    pub fn lookup_raw_text(&self, date: &str, id: &str) -> Result<String> {
        let rows = self.matching_rows(date, id)?;
        let first = rows.first().copied().ok_or_else(|| LedgerError::NotFound {
            date: date.to_string(),
            id: id.to_string(),
        })?;

        if rows.len() > 1 {
            warn!(
                date,
                id,
                matches = rows.len(),
                %first,
                "Several vouchers share this date and id, returning the earliest"
            );
        }

        self.raw_text_by_row(first)
    }

    /// Every voucher stored under `(date, id)`, in row-id order
    pub fn lookup_all(&self, date: &str, id: &str) -> Result<Vec<VoucherRecord>> {
        self.matching_rows(date, id)?
            .into_iter()
            .map(|row_id| self.record(row_id))
            .collect()
    }

    /// Original text of the voucher with the given row id
    pub fn raw_text_by_row(&self, row_id: RowId) -> Result<String> {
        let bytes = self
            .documents
            .get(encode_row_key(row_id))?
            .ok_or(LedgerError::RowNotFound(row_id.0))?;

        debug!(%row_id, bytes = bytes.len(), "Loaded voucher document");
        String::from_utf8(bytes.to_vec())
            .map_err(|_| LedgerError::Corrupt(format!("document {row_id} is not UTF-8")))
    }

    /// Full record (summary and document) for a row id
    pub fn record(&self, row_id: RowId) -> Result<VoucherRecord> {
        let value = self
            .summaries
            .get(encode_row_key(row_id))?
            .ok_or(LedgerError::RowNotFound(row_id.0))?;
        let summary = serde_json::from_slice(&value)?;
        let raw_text = self.raw_text_by_row(row_id)?;
        Ok(VoucherRecord { summary, raw_text })
    }

    pub fn contains_key(&self, date: &str, id: &str) -> Result<bool> {
        match self.natural_keys.prefix(encode_natural_prefix(date, id)).next() {
            Some(item) => {
                item?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of stored vouchers
    pub fn len(&self) -> Result<usize> {
        let mut count = 0;
        for item in self.summaries.iter() {
            item?;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.summaries.first_key_value()?.is_none())
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    /// Flush and release the store
    pub fn close(self) -> Result<()> {
        self.persist()?;
        info!("Voucher store closed");
        Ok(())
    }

    /// Get internal statistics (for debugging/monitoring)
    pub fn stats(&self) -> Result<StoreStats> {
        let voucher_count = self.len()?;

        let mut key_count = 0;
        for item in self.natural_keys.iter() {
            item?;
            key_count += 1;
        }

        let mut document_bytes = 0u64;
        for item in self.documents.iter() {
            let (_, value) = item?;
            document_bytes += value.len() as u64;
        }

        Ok(StoreStats {
            voucher_count,
            key_count,
            document_bytes,
            next_row_id: self.next_row_id.load(Ordering::SeqCst),
        })
    }

    fn matching_rows(&self, date: &str, id: &str) -> Result<Vec<RowId>> {
        let mut rows = Vec::new();
        for item in self.natural_keys.prefix(encode_natural_prefix(date, id)) {
            let (key, _) = item?;
            let row_id = decode_natural_key_row(&key).ok_or_else(|| {
                LedgerError::InvalidKey(String::from_utf8_lossy(&key).into_owned())
            })?;
            rows.push(row_id);
        }
        Ok(rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub voucher_count: usize,
    pub key_count: usize,
    pub document_bytes: u64,
    pub next_row_id: u64,
}
