/// Voucher parsing, structural validation and debit/credit aggregation
///
/// This module is pure: it never touches the store. A submitted document is
/// turned into a [`Voucher`] (ready for insertion) or rejected with a
/// [`ValidationError`].
///
/// ## Document shape
///
/// ```json
/// {
///   "凭证日期": "2024-01-01",
///   "凭证编号": "V1",
///   "科目明细": [
///     {"借方金额": 100.555, "贷方金额": 0},
///     {"借方金额": 0, "贷方金额": 100.555}
///   ]
/// }
/// ```
///
/// The key names are configurable through [`FieldNames`]; the defaults above
/// match the historical data set.
///
/// ## Rounding
///
/// Amounts are read from their literal JSON text into [`rust_decimal::Decimal`]
/// and summed exactly. Totals are then rounded to 2 decimal places using
/// round-half-to-even (see [`round_money`]), so `100.555` becomes `100.56`
/// and `100.545` becomes `100.54`.
///
/// ## Usage
///
/// ```rust,ignore
/// use voucherbox::voucher::{validate_and_aggregate, FieldNames};
///
/// let voucher = validate_and_aggregate(text, &FieldNames::default())?;
/// println!("{} / {}", voucher.debit_total, voucher.credit_total);
/// ```

pub mod error;
pub mod model;
pub mod validate;

pub use error::{Result, ValidationError};
pub use model::{FieldNames, LineItem, Voucher};
pub use validate::{MONEY_SCALE, Validator, round_money, validate_and_aggregate};
