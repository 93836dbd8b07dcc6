use thiserror::Error;

/// Failure taxonomy of the ledger services. The REST layer maps each
/// variant to exactly one status code.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The store failed for any other reason. `details` is only filled in
    /// where the caller is allowed to see the store's own message.
    #[error("{message}")]
    Persistence {
        message: String,
        details: Option<String>,
    },
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LedgerError::NotFound(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        LedgerError::Persistence {
            message: message.into(),
            details: None,
        }
    }

    pub fn persistence_with_details(message: impl Into<String>, source: &anyhow::Error) -> Self {
        LedgerError::Persistence {
            message: message.into(),
            details: Some(format!("{:#}", source)),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
