use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid JSON format: {0}")]
    MalformedJson(String),

    #[error("Missing key in JSON: {0}")]
    MissingField(String),

    #[error("{0} must be a JSON object")]
    NotAnObject(String),

    #[error("'{0}' must be a JSON array")]
    NotAnArray(String),

    #[error("line item {index}: '{field}' must be a decimal number")]
    InvalidAmount { field: String, index: usize },

    #[error("sum of '{0}' overflows the decimal range")]
    AmountOverflow(String),

    #[error("document is {actual} bytes, limit is {limit} bytes")]
    DocumentTooLarge { actual: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
