//! Currency definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{CoreError, Result};

/// Largest exponent a currency may use. Bounded by the scale `Decimal` can carry.
pub const MAX_EXPONENT: u32 = 28;

/// Shared handle to a registered currency.
///
/// The registry owns every `Currency`; amounts and accounts only hold this
/// handle, so currency data is never duplicated per value.
pub type CurrencyRef = Arc<Currency>;

/// A unit of value with a fixed number of decimal places.
///
/// Deserialization goes through [`Currency::new`], so stored definitions get
/// the same checks as registered ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CurrencyDef")]
pub struct Currency {
    code: String,
    symbol: String,
    exponent: u32,
}

impl Currency {
    /// Create a currency definition. The code is stored upper-cased.
    pub fn new(code: &str, symbol: impl Into<String>, exponent: u32) -> Result<Self> {
        let code = normalize_code(code)?;
        if exponent > MAX_EXPONENT {
            return Err(CoreError::InvalidExponent {
                code,
                exponent,
                max: MAX_EXPONENT,
            });
        }
        let symbol = symbol.into();
        let symbol = if symbol.trim().is_empty() {
            code.clone()
        } else {
            symbol
        };
        Ok(Self {
            code,
            symbol,
            exponent,
        })
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the display symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of decimal places.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }
}

#[derive(Deserialize)]
struct CurrencyDef {
    code: String,
    #[serde(default)]
    symbol: String,
    exponent: u32,
}

impl TryFrom<CurrencyDef> for Currency {
    type Error = CoreError;

    fn try_from(def: CurrencyDef) -> Result<Self> {
        Currency::new(&def.code, def.symbol, def.exponent)
    }
}

// Codes are unique within a registry, so identity is the code alone.
impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Canonical form of a currency code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidCurrencyCode(code.to_string()));
    }
    Ok(trimmed.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_uppercased() {
        let cad = Currency::new(" cad ", "C$", 2).unwrap();
        assert_eq!(cad.code(), "CAD");
        assert_eq!(cad.symbol(), "C$");
        assert_eq!(cad.exponent(), 2);
    }

    #[test]
    fn test_blank_symbol_falls_back_to_code() {
        let xts = Currency::new("XTS", "", 0).unwrap();
        assert_eq!(xts.symbol(), "XTS");
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(matches!(
            Currency::new("  ", "$", 2),
            Err(CoreError::InvalidCurrencyCode(_))
        ));
        assert!(matches!(
            Currency::new("U SD", "$", 2),
            Err(CoreError::InvalidCurrencyCode(_))
        ));
        assert!(matches!(
            Currency::new("BIG", "B", 29),
            Err(CoreError::InvalidExponent { exponent: 29, .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let cad: Currency = serde_json::from_str(r#"{"code":"cad","symbol":"C$","exponent":2}"#).unwrap();
        assert_eq!(cad.code(), "CAD");

        let bare: Currency = serde_json::from_str(r#"{"code":"XTS","exponent":0}"#).unwrap();
        assert_eq!(bare.symbol(), "XTS");

        assert!(serde_json::from_str::<Currency>(r#"{"code":"usd","symbol":"$","exponent":30}"#).is_err());
        assert!(serde_json::from_str::<Currency>(r#"{"code":" ","symbol":"$","exponent":2}"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let kwd = Currency::new("KWD", "KD", 3).unwrap();
        let json = serde_json::to_string(&kwd).unwrap();
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kwd);
        assert_eq!(back.exponent(), 3);
    }

    #[test]
    fn test_equality_by_code() {
        let a = Currency::new("usd", "$", 2).unwrap();
        let b = Currency::new("USD", "US$", 2).unwrap();
        assert_eq!(a, b);
    }
}
