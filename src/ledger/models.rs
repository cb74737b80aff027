//! Records returned by the voucher store.
//!
//! A listing is a sequence of [`ListItem`]s: one [`ListItem::Summary`] per
//! stored voucher in row-id order, followed by exactly one
//! [`ListItem::GrandTotal`]. The grand total is a synthetic row and carries no
//! natural key, so it can never be passed to a lookup by mistake.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::voucher::round_money;

use super::error::{LedgerError, Result};

/// Surrogate key assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Per-voucher row of the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub row_id: RowId,
    pub date: String,
    pub id: String,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    pub stored_at: DateTime<Utc>,
}

/// Full stored voucher, summary plus the original document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoucherRecord {
    #[serde(flatten)]
    pub summary: SummaryRow,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GrandTotals {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl GrandTotals {
    /// Sum and round the totals of `rows`; zero rows give 0.00 / 0.00
    ///
    /// Each voucher total fits in a `Decimal` but their sum may not, in which
    /// case `TotalOverflow` names the column that overflowed.
    pub fn over<'a>(rows: impl IntoIterator<Item = &'a SummaryRow>) -> Result<Self> {
        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;

        for row in rows {
            debit = debit
                .checked_add(row.debit_total)
                .ok_or(LedgerError::TotalOverflow("debit"))?;
            credit = credit
                .checked_add(row.credit_total)
                .ok_or(LedgerError::TotalOverflow("credit"))?;
        }

        Ok(Self {
            debit: round_money(debit),
            credit: round_money(credit),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListItem {
    Summary(SummaryRow),
    GrandTotal(GrandTotals),
}

/// Result of `list_summaries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    items: Vec<ListItem>,
}

impl Listing {
    /// Build a listing from rows, appending the recomputed grand total
    pub fn from_rows(rows: Vec<SummaryRow>) -> Result<Self> {
        let totals = GrandTotals::over(&rows)?;
        let mut items: Vec<ListItem> = rows.into_iter().map(ListItem::Summary).collect();
        items.push(ListItem::GrandTotal(totals));
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn summaries(&self) -> impl Iterator<Item = &SummaryRow> {
        self.items.iter().filter_map(|item| match item {
            ListItem::Summary(row) => Some(row),
            ListItem::GrandTotal(_) => None,
        })
    }

    pub fn grand_totals(&self) -> GrandTotals {
        self.items
            .iter()
            .rev()
            .find_map(|item| match item {
                ListItem::GrandTotal(totals) => Some(*totals),
                ListItem::Summary(_) => None,
            })
            .unwrap_or_default()
    }

    /// Number of stored vouchers (the grand total row is not counted)
    pub fn len(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
