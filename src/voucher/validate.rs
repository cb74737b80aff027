use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::error::{Result, ValidationError};
use super::model::{FieldNames, LineItem, Voucher};

/// Decimal places kept on every stored total
pub const MONEY_SCALE: u32 = 2;

/// Round a monetary amount to [`MONEY_SCALE`] places, half-to-even
///
/// This is the only rounding rule in the crate; voucher totals and the
/// listing's grand totals both go through it.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Validate `raw_text` with default options (optional header fields, no size limit)
pub fn validate_and_aggregate(raw_text: &str, fields: &FieldNames) -> Result<Voucher> {
    Validator::new(fields.clone()).validate(raw_text)
}

/// Configurable voucher validator
#[derive(Debug, Clone, Default)]
pub struct Validator {
    fields: FieldNames,
    require_header_fields: bool,
    max_document_bytes: Option<u64>,
}

impl Validator {
    pub fn new(fields: FieldNames) -> Self {
        Self {
            fields,
            require_header_fields: false,
            max_document_bytes: None,
        }
    }

    /// Reject documents without a date or id field instead of storing empty strings
    pub fn require_header_fields(mut self, required: bool) -> Self {
        self.require_header_fields = required;
        self
    }

    pub fn max_document_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_document_bytes = limit;
        self
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Parse, check and aggregate one voucher document
    ///
    /// Checks run fail-fast in this order: size limit, JSON syntax, top-level
    /// object, header fields (when required), line-item array, then each line
    /// item in order (object, debit present, credit present, debit numeric,
    /// credit numeric).
    pub fn validate(&self, raw_text: &str) -> Result<Voucher> {
        if let Some(limit) = self.max_document_bytes {
            let actual = raw_text.len() as u64;
            if actual > limit {
                return Err(ValidationError::DocumentTooLarge { actual, limit });
            }
        }

        let document: Value = serde_json::from_str(raw_text)
            .map_err(|err| ValidationError::MalformedJson(err.to_string()))?;
        let document = document
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject("voucher document".to_string()))?;

        let date = self.header(document, &self.fields.date)?;
        let id = self.header(document, &self.fields.id)?;

        let lines = document
            .get(&self.fields.lines)
            .ok_or_else(|| ValidationError::MissingField(self.fields.lines.clone()))?
            .as_array()
            .ok_or_else(|| ValidationError::NotAnArray(self.fields.lines.clone()))?;

        let lines = lines
            .iter()
            .enumerate()
            .map(|(index, item)| self.line_item(index, item))
            .collect::<Result<Vec<_>>>()?;

        let debit_total = sum(&self.fields.debit, lines.iter().map(|l| l.debit_amount))?;
        let credit_total = sum(&self.fields.credit, lines.iter().map(|l| l.credit_amount))?;

        debug!(
            date = %date,
            id = %id,
            lines = lines.len(),
            %debit_total,
            %credit_total,
            "Voucher validated"
        );

        Ok(Voucher {
            date,
            id,
            lines,
            debit_total,
            credit_total,
            raw_text: raw_text.to_string(),
        })
    }

    /// A string is taken verbatim, null/absent becomes "" and other scalars
    /// keep their JSON text.
    fn header(&self, document: &Map<String, Value>, key: &str) -> Result<String> {
        match document.get(key) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(Value::Null) | None if !self.require_header_fields => Ok(String::new()),
            Some(Value::Null) | None => Err(ValidationError::MissingField(key.to_string())),
            Some(other) => Ok(other.to_string()),
        }
    }

    fn line_item(&self, index: usize, item: &Value) -> Result<LineItem> {
        let item = item
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject(format!("line item {index}")))?;

        let debit = field(item, &self.fields.debit)?;
        let credit = field(item, &self.fields.credit)?;

        Ok(LineItem {
            debit_amount: amount(debit, &self.fields.debit, index)?,
            credit_amount: amount(credit, &self.fields.credit, index)?,
        })
    }
}

fn field<'a>(item: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    item.get(key)
        .ok_or_else(|| ValidationError::MissingField(key.to_string()))
}

fn amount(value: &Value, field: &str, index: usize) -> Result<Decimal> {
    let invalid = || ValidationError::InvalidAmount {
        field: field.to_string(),
        index,
    };

    match value {
        Value::Number(number) => parse_number(number).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Numbers keep their source text (`arbitrary_precision`), so `100.555`
/// arrives here as exactly that string rather than a binary float.
fn parse_number(number: &Number) -> Option<Decimal> {
    let literal = number.to_string();
    Decimal::from_str(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .ok()
}

fn sum(field: &str, mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal> {
    amounts
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .map(round_money)
        .ok_or_else(|| ValidationError::AmountOverflow(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{"凭证日期":"2024-01-01","凭证编号":"V1","科目明细":[{"借方金额":100.555,"贷方金额":0},{"借方金额":0,"贷方金额":100.555}]}"#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn validate(text: &str) -> Result<Voucher> {
        validate_and_aggregate(text, &FieldNames::default())
    }

    #[test]
    fn test_scenario_rounds_half_to_even() {
        let voucher = validate(SCENARIO).unwrap();

        assert_eq!(voucher.date, "2024-01-01");
        assert_eq!(voucher.id, "V1");
        assert_eq!(voucher.lines.len(), 2);
        assert_eq!(voucher.debit_total, dec("100.56"));
        assert_eq!(voucher.credit_total, dec("100.56"));
        assert_eq!(voucher.raw_text, SCENARIO);
    }

    #[test]
    fn test_round_money_midpoints() {
        assert_eq!(round_money(dec("100.555")), dec("100.56"));
        assert_eq!(round_money(dec("100.545")), dec("100.54"));
        assert_eq!(round_money(dec("0.125")), dec("0.12"));
        assert_eq!(round_money(dec("0.135")), dec("0.14"));
        assert_eq!(round_money(dec("-2.675")), dec("-2.68"));
    }

    #[test]
    fn test_sum_is_exact_before_rounding() {
        // 0.1 + 0.2 drifts as binary floats; the decimal sum must be 0.30
        let text = r#"{"科目明细":[{"借方金额":0.1,"贷方金额":0},{"借方金额":0.2,"贷方金额":0.005}]}"#;
        let voucher = validate(text).unwrap();
        assert_eq!(voucher.debit_total, dec("0.30"));
        assert_eq!(voucher.credit_total, dec("0.00"));
    }

    #[test]
    fn test_empty_lines_total_zero() {
        let voucher = validate(r#"{"凭证日期":"d","凭证编号":"i","科目明细":[]}"#).unwrap();
        assert!(voucher.lines.is_empty());
        assert_eq!(voucher.debit_total, Decimal::ZERO);
        assert_eq!(voucher.credit_total, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_json() {
        let err = validate("not json").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedJson(_)));
    }

    #[test]
    fn test_missing_lines_field() {
        let err = validate(r#"{"凭证日期":"2024-01-01","凭证编号":"V1"}"#).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("科目明细".to_string()));
    }

    #[test]
    fn test_missing_debit_reports_first_offender() {
        let text = r#"{"科目明细":[{"借方金额":1,"贷方金额":0},{"贷方金额":1},{"借方金额":1}]}"#;
        let err = validate(text).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("借方金额".to_string()));
    }

    #[test]
    fn test_missing_credit() {
        let text = r#"{"科目明细":[{"借方金额":1}]}"#;
        let err = validate(text).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("贷方金额".to_string()));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            validate("[1, 2]").unwrap_err(),
            ValidationError::NotAnObject(_)
        ));
        assert_eq!(
            validate(r#"{"科目明细": {}}"#).unwrap_err(),
            ValidationError::NotAnArray("科目明细".to_string())
        );
        assert_eq!(
            validate(r#"{"科目明细": [42]}"#).unwrap_err(),
            ValidationError::NotAnObject("line item 0".to_string())
        );
    }

    #[test]
    fn test_non_numeric_amount() {
        let text = r#"{"科目明细":[{"借方金额":"10","贷方金额":0}]}"#;
        let err = validate(text).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidAmount {
                field: "借方金额".to_string(),
                index: 0
            }
        );
    }

    #[test]
    fn test_scientific_notation_amount() {
        let text = r#"{"科目明细":[{"借方金额":1.5e2,"贷方金额":25E-1}]}"#;
        let voucher = validate(text).unwrap();
        assert_eq!(voucher.debit_total, dec("150"));
        assert_eq!(voucher.credit_total, dec("2.5"));
    }

    #[test]
    fn test_header_fields_are_optional_by_default() {
        let voucher = validate(r#"{"凭证编号": 7, "科目明细": []}"#).unwrap();
        assert_eq!(voucher.date, "");
        assert_eq!(voucher.id, "7");
    }

    #[test]
    fn test_required_header_fields() {
        let validator = Validator::new(FieldNames::default()).require_header_fields(true);
        let err = validator
            .validate(r#"{"凭证编号":"V1","科目明细":[]}"#)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("凭证日期".to_string()));
    }

    #[test]
    fn test_amounts_outside_decimal_range_are_invalid() {
        for (debit, credit, field, index) in [
            ("1e-30", "0", "借方金额", 0),
            ("0", "1e30", "贷方金额", 0),
        ] {
            let text =
                format!(r#"{{"科目明细":[{{"借方金额":{debit},"贷方金额":{credit}}}]}}"#);
            assert_eq!(
                validate(&text).unwrap_err(),
                ValidationError::InvalidAmount {
                    field: field.to_string(),
                    index
                }
            );
        }

        let voucher = validate(r#"{"科目明细":[{"借方金额":5e28,"贷方金额":1e-28}]}"#).unwrap();
        assert_eq!(voucher.debit_total, dec("50000000000000000000000000000"));
        assert_eq!(voucher.credit_total, Decimal::ZERO);
    }

    #[test]
    fn test_document_size_limit() {
        let validator = Validator::new(FieldNames::default()).max_document_bytes(Some(16));
        let err = validator.validate(SCENARIO).unwrap_err();
        assert!(matches!(err, ValidationError::DocumentTooLarge { limit: 16, .. }));
    }

    #[test]
    fn test_custom_field_names() {
        let fields = FieldNames {
            date: "date".to_string(),
            id: "number".to_string(),
            lines: "entries".to_string(),
            debit: "dr".to_string(),
            credit: "cr".to_string(),
        };
        let text = r#"{"date":"2024-02-01","number":"A-9","entries":[{"dr":12.345,"cr":0},{"dr":0,"cr":12.345}]}"#;
        let voucher = validate_and_aggregate(text, &fields).unwrap();
        assert_eq!(voucher.id, "A-9");
        assert_eq!(voucher.debit_total, dec("12.34"));
        assert_eq!(voucher.credit_total, dec("12.34"));
    }

    #[test]
    fn test_raw_text_kept_byte_for_byte() {
        let text = "  {\n  \"科目明细\" : [ ]\n}\n";
        let voucher = validate(text).unwrap();
        assert_eq!(voucher.raw_text.as_bytes(), text.as_bytes());
    }
}
