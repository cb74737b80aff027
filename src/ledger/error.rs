use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Voucher not found: date '{date}', id '{id}'")]
    NotFound { date: String, id: String },

    #[error("Voucher row not found: {0}")]
    RowNotFound(u64),

    #[error("Voucher already stored: date '{date}', id '{id}'")]
    DuplicateKey { date: String, id: String },

    #[error("Invalid key format: {0}")]
    InvalidKey(String),

    #[error("Grand {0} total exceeds the decimal range")]
    TotalOverflow(&'static str),

    #[error("Voucher row {row_id} committed but not persisted: {source}")]
    NotDurable {
        row_id: u64,
        #[source]
        source: fjall::Error,
    },

    #[error("Corrupt entry: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
