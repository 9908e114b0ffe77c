//! Registry configuration.

/// Configuration for a [`CurrencyRegistry`](crate::CurrencyRegistry).
#[derive(Debug, Clone)]
pub struct FxConfig {
    /// Code of the currency all rates are expressed in.
    pub reference_currency: String,
    /// Seed the registry with the built-in currency table.
    pub builtin_currencies: bool,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            reference_currency: "USD".to_string(),
            builtin_currencies: true,
        }
    }
}

impl FxConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(code) = std::env::var("TALLY_REFERENCE_CURRENCY") {
            config.reference_currency = code.trim().to_uppercase();
        }

        if let Ok(flag) = std::env::var("TALLY_BUILTIN_CURRENCIES") {
            if let Ok(flag) = flag.parse() {
                config.builtin_currencies = flag;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.reference_currency.trim().is_empty() {
            return Err("Reference currency cannot be empty".to_string());
        }

        if self.reference_currency.chars().any(char::is_whitespace) {
            return Err("Reference currency cannot contain whitespace".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reference_currency, "USD");
    }

    #[test]
    fn test_invalid_config() {
        let mut config = FxConfig::default();
        config.reference_currency = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
