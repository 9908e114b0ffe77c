//! Error types for the Tallybook accounting core.

use thiserror::Error;

/// Errors raised by currency, amount and account primitives.
///
/// Every variant is a local, recoverable condition. Callers (document,
/// persistence or UI layers) decide how to surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A currency with this code is already registered.
    #[error("Duplicate currency: {0}")]
    DuplicateCurrency(String),

    /// No currency with this code is registered.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Exchange rates must be strictly positive.
    #[error("Invalid rate {rate} for {code}")]
    InvalidRate { code: String, rate: String },

    /// The currency has no recorded exchange rate at all.
    #[error("No rate data for {0}")]
    NoRateData(String),

    /// Arithmetic or comparison between two different currencies.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    /// Names must contain at least one non-whitespace character.
    #[error("Name cannot be empty")]
    EmptyName,

    /// Currency codes must be non-blank and free of whitespace.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    /// Exponent is larger than what a scaled decimal can hold.
    #[error("Invalid exponent {exponent} for {code} (max {max})")]
    InvalidExponent { code: String, exponent: u32, max: u32 },

    /// Text could not be read as an amount.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Result does not fit in the scaled decimal range.
    #[error("Arithmetic overflow")]
    Overflow,
}

impl CoreError {
    /// Get a stable error code, suitable for logs and persisted diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::DuplicateCurrency(_) => "DUPLICATE_CURRENCY",
            CoreError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            CoreError::InvalidRate { .. } => "INVALID_RATE",
            CoreError::NoRateData(_) => "NO_RATE_DATA",
            CoreError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            CoreError::EmptyName => "EMPTY_NAME",
            CoreError::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
            CoreError::InvalidExponent { .. } => "INVALID_EXPONENT",
            CoreError::InvalidAmount(_) => "INVALID_AMOUNT",
            CoreError::Overflow => "OVERFLOW",
        }
    }

    /// Whether the error comes from mixing currencies.
    pub fn is_currency_mismatch(&self) -> bool {
        matches!(self, CoreError::CurrencyMismatch { .. })
    }

    pub(crate) fn mismatch(expected: &str, actual: &str) -> Self {
        CoreError::CurrencyMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
