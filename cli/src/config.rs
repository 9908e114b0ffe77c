//! Command-line configuration.

use tallybook_fx::FxConfig;

/// Configuration for the `tally` binary.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Registry configuration.
    pub fx: FxConfig,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON.
    pub json_logs: bool,
    /// Currency assumed for amounts written without a code.
    pub default_currency: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            fx: FxConfig::default(),
            log_level: "warn".to_string(),
            json_logs: false,
            default_currency: "USD".to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            fx: FxConfig::from_env(),
            ..Self::default()
        };

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(flag) = std::env::var("TALLY_LOG_JSON") {
            config.json_logs = matches!(flag.trim(), "1" | "true" | "yes");
        }

        if let Ok(code) = std::env::var("TALLY_DEFAULT_CURRENCY") {
            config.default_currency = code.trim().to_uppercase();
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.fx.validate()?;

        if self.log_level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        if self.default_currency.trim().is_empty() {
            return Err("Default currency cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_currency, "USD");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = CliConfig::default();
        config.default_currency = String::new();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.fx.reference_currency = "U S".to_string();
        assert!(config.validate().is_err());
    }
}
