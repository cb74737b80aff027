use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// JSON keys read from a submitted voucher document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldNames {
    #[serde(default = "default_date_field")]
    pub date: String,
    #[serde(default = "default_id_field")]
    pub id: String,
    /// Key of the line-item array
    #[serde(default = "default_lines_field")]
    pub lines: String,
    #[serde(default = "default_debit_field")]
    pub debit: String,
    #[serde(default = "default_credit_field")]
    pub credit: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            date: default_date_field(),
            id: default_id_field(),
            lines: default_lines_field(),
            debit: default_debit_field(),
            credit: default_credit_field(),
        }
    }
}

fn default_date_field() -> String {
    "凭证日期".to_string()
}

fn default_id_field() -> String {
    "凭证编号".to_string()
}

fn default_lines_field() -> String {
    "科目明细".to_string()
}

fn default_debit_field() -> String {
    "借方金额".to_string()
}

fn default_credit_field() -> String {
    "贷方金额".to_string()
}

/// One entry of a voucher's line-item array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
}

/// A validated voucher, ready to be inserted into the store
///
/// `debit_total` and `credit_total` are already rounded to two decimal places.
/// `raw_text` is the submitted document, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    pub date: String,
    pub id: String,
    pub lines: Vec<LineItem>,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_field_names() {
        let fields = FieldNames::default();
        assert_eq!(fields.date, "凭证日期");
        assert_eq!(fields.id, "凭证编号");
        assert_eq!(fields.lines, "科目明细");
        assert_eq!(fields.debit, "借方金额");
        assert_eq!(fields.credit, "贷方金额");
    }

    #[test]
    fn test_partial_field_names_fill_defaults() {
        let fields: FieldNames = serde_json::from_str(r#"{"lines": "entries"}"#).unwrap();
        assert_eq!(fields.lines, "entries");
        assert_eq!(fields.debit, "借方金额");
    }
}
