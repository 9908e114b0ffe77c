//! Subcommand implementations.
//!
//! Each command returns the text to print so it can be checked without a terminal.

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use tallybook_common::FormatOptions;
use tallybook_fx::CurrencyRegistry;
use tallybook_ledger::{Account, AccountType};

use crate::config::CliConfig;

/// A rate given on the command line as `CODE:YYYY-MM-DD:RATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpec {
    pub code: String,
    pub date: NaiveDate,
    pub rate: Decimal,
}

impl FromStr for RateSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(code), Some(date), Some(rate)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected CODE:YYYY-MM-DD:RATE, got '{}'", s));
        };
        let date = date
            .trim()
            .parse::<NaiveDate>()
            .map_err(|e| format!("invalid date '{}': {}", date, e))?;
        let rate = rate
            .trim()
            .parse::<Decimal>()
            .map_err(|e| format!("invalid rate '{}': {}", rate, e))?;
        Ok(Self {
            code: code.trim().to_string(),
            date,
            rate,
        })
    }
}

/// Build the registry from configuration and load command-line rates into it.
pub fn build_registry(config: &CliConfig, rates: &[RateSpec]) -> Result<CurrencyRegistry> {
    let mut registry =
        CurrencyRegistry::with_config(&config.fx).context("Failed to create currency registry")?;
    for spec in rates {
        registry
            .add_rate(&spec.code, spec.date, spec.rate)
            .with_context(|| format!("Failed to add rate {}:{}:{}", spec.code, spec.date, spec.rate))?;
    }
    debug!(rates = rates.len(), "Loaded command-line rates");
    Ok(registry)
}

/// Render an amount with the given display options.
pub fn format(
    registry: &CurrencyRegistry,
    config: &CliConfig,
    text: &str,
    options: FormatOptions,
) -> Result<String> {
    let amount = registry
        .parse_amount(text, &config.default_currency)
        .with_context(|| format!("Cannot read amount '{}'", text))?;
    Ok(amount.format(&options))
}

/// Show the canonical form of an amount and its minor units.
pub fn parse(registry: &CurrencyRegistry, config: &CliConfig, text: &str) -> Result<String> {
    let amount = registry
        .parse_amount(text, &config.default_currency)
        .with_context(|| format!("Cannot read amount '{}'", text))?;
    Ok(format!("{} ({} minor units)", amount, amount.minor_units()))
}

/// Convert an amount, showing the rates that were applied.
pub fn convert(
    registry: &CurrencyRegistry,
    config: &CliConfig,
    text: &str,
    target: &str,
    date: NaiveDate,
) -> Result<String> {
    let amount = registry
        .parse_amount(text, &config.default_currency)
        .with_context(|| format!("Cannot read amount '{}'", text))?;
    let conversion = registry
        .convert_detailed(&amount, target, date)
        .with_context(|| format!("Cannot convert {} to {}", amount, target))?;

    info!(input = %conversion.input, output = %conversion.output, %date, "Conversion done");

    let mut out = format!("{} = {}", conversion.input, conversion.output);
    if !conversion.is_identity() {
        let _ = write!(
            out,
            " on {} (rates {} / {}, cross {})",
            date,
            conversion.source_rate,
            conversion.target_rate,
            conversion.cross_rate().normalize()
        );
    }
    Ok(out)
}

/// Show an amount the way an account of `account_type` displays it.
pub fn normalize(
    registry: &CurrencyRegistry,
    config: &CliConfig,
    text: &str,
    account_type: &str,
) -> Result<String> {
    let account_type: AccountType = account_type.parse()?;
    let amount = registry
        .parse_amount(text, &config.default_currency)
        .with_context(|| format!("Cannot read amount '{}'", text))?;
    let currency = match amount.currency() {
        Some(currency) => currency.clone(),
        None => registry.lookup(&config.default_currency)?,
    };

    let account = Account::new(account_type.name(), currency, account_type)?;
    let normalized = account.normalize_amount(&amount);
    Ok(format!(
        "{} ({} normal balance) -> {}",
        account.type_name(),
        if account.is_debit() { "debit" } else { "credit" },
        normalized
    ))
}

/// List registered currencies, marking the reference currency.
pub fn currencies(registry: &CurrencyRegistry) -> Result<String> {
    if registry.is_empty() {
        bail!("No currencies registered");
    }
    let mut out = String::new();
    for currency in registry.currencies() {
        let marker = if currency.code() == registry.reference_currency() {
            " (reference)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<4} {:<4} {}{}",
            currency.code(),
            currency.symbol(),
            currency.exponent(),
            marker
        );
    }
    Ok(out)
}
