//! Ledger error types.

use tallybook_common::CoreError;
use thiserror::Error;

/// Errors raised by accounts and the account book.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Error from the currency and amount primitives.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Another account already uses this name (ignoring case and accents).
    #[error("Account name already in use: {0}")]
    DuplicateAccountName(String),

    /// No account with this name.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Text is not one of the four account type names.
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),
}

impl LedgerError {
    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::Core(err) => err.error_code(),
            LedgerError::DuplicateAccountName(_) => "DUPLICATE_ACCOUNT_NAME",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::UnknownAccountType(_) => "UNKNOWN_ACCOUNT_TYPE",
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
