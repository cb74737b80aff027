use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field name '{field}' must not be empty")]
    EmptyFieldName { field: &'static str },

    #[error("Field names '{first}' and '{second}' both map to key '{key}'")]
    DuplicateFieldName {
        first: &'static str,
        second: &'static str,
        key: String,
    },

    #[error("Store path must not be empty")]
    EmptyStorePath,

    #[error("max_document_bytes must be positive")]
    InvalidDocumentLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_fields(config)?;
    validate_store(config)?;
    validate_limits(config)?;
    Ok(())
}

/// Every configured JSON key must be non-empty and distinct from the others
fn validate_fields(config: &Config) -> Result<(), ValidationError> {
    let fields = &config.fields;
    let named = [
        ("date", &fields.date),
        ("id", &fields.id),
        ("lines", &fields.lines),
        ("debit", &fields.debit),
        ("credit", &fields.credit),
    ];

    for (field, key) in named {
        if key.trim().is_empty() {
            return Err(ValidationError::EmptyFieldName { field });
        }
    }

    for (index, &(second, key)) in named.iter().enumerate() {
        if let Some(&(first, _)) = named[..index].iter().find(|(_, other)| *other == key) {
            return Err(ValidationError::DuplicateFieldName {
                first,
                second,
                key: key.clone(),
            });
        }
    }

    Ok(())
}

fn validate_store(config: &Config) -> Result<(), ValidationError> {
    if config.store.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyStorePath);
    }
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ValidationError> {
    if let Some(limit) = config.validation.max_document_bytes {
        if limit.as_u64() == 0 {
            return Err(ValidationError::InvalidDocumentLimit);
        }
    }
    Ok(())
}
