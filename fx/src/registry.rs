//! The currency registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use tallybook_common::{Amount, CoreError, Currency, CurrencyRef, Result};

use crate::builtin::BUILTIN_CURRENCIES;
use crate::config::FxConfig;
use crate::conversion::Conversion;
use crate::rates::RateTable;

/// Registered currency with its rate history.
#[derive(Debug, Clone)]
struct CurrencyEntry {
    currency: CurrencyRef,
    rates: RateTable,
}

/// Catalog of currencies and their historical rates.
///
/// Rates express the value of one unit of a currency in the reference
/// currency, whose rate is always 1. The registry has no internal locking;
/// wrap it in a [`SharedRegistry`] to share it between threads.
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    entries: HashMap<String, CurrencyEntry>,
    reference: String,
}

/// Registry shared between threads: one writer during imports, readers otherwise.
pub type SharedRegistry = Arc<RwLock<CurrencyRegistry>>;

impl CurrencyRegistry {
    /// Create an empty registry with USD as the reference currency.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reference: FxConfig::default().reference_currency,
        }
    }

    /// Create a registry from configuration.
    pub fn with_config(config: &FxConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|_| CoreError::InvalidCurrencyCode(config.reference_currency.clone()))?;

        let mut registry = Self {
            entries: HashMap::new(),
            reference: tallybook_common::normalize_code(&config.reference_currency)?,
        };
        if config.builtin_currencies {
            for (code, symbol, exponent) in BUILTIN_CURRENCIES {
                registry.register(code, *symbol, *exponent)?;
            }
        }

        info!(
            reference = %registry.reference,
            currencies = registry.len(),
            "Currency registry ready"
        );
        Ok(registry)
    }

    /// Create a registry seeded with the built-in currencies.
    pub fn with_builtin_currencies() -> Result<Self> {
        Self::with_config(&FxConfig::default())
    }

    /// Wrap the registry for shared use.
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Register a new currency.
    pub fn register(&mut self, code: &str, symbol: impl Into<String>, exponent: u32) -> Result<CurrencyRef> {
        let currency = Currency::new(code, symbol, exponent)?;
        if self.entries.contains_key(currency.code()) {
            return Err(CoreError::DuplicateCurrency(currency.code().to_string()));
        }

        let currency = Arc::new(currency);
        debug!(code = %currency, exponent, "Registered currency");
        self.entries.insert(
            currency.code().to_string(),
            CurrencyEntry {
                currency: currency.clone(),
                rates: RateTable::new(),
            },
        );
        Ok(currency)
    }

    /// Get a currency by code, case-insensitively.
    pub fn lookup(&self, code: &str) -> Result<CurrencyRef> {
        self.entry(code).map(|e| e.currency.clone())
    }

    /// Check if a currency is registered.
    pub fn contains(&self, code: &str) -> bool {
        self.entry(code).is_ok()
    }

    /// Get the reference currency code.
    pub fn reference_currency(&self) -> &str {
        &self.reference
    }

    /// Get all currencies, sorted by code.
    pub fn currencies(&self) -> Vec<CurrencyRef> {
        let mut currencies: Vec<_> = self.entries.values().map(|e| e.currency.clone()).collect();
        currencies.sort_by(|a, b| a.code().cmp(b.code()));
        currencies
    }

    /// Get the recorded rates of a currency.
    pub fn rates(&self, code: &str) -> Result<&RateTable> {
        self.entry(code).map(|e| &e.rates)
    }

    /// Get the number of registered currencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no currency is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record the rate of `code` for `date`, replacing any rate for that exact date.
    ///
    /// The reference currency only accepts a rate of 1.
    #[instrument(skip(self))]
    pub fn add_rate(&mut self, code: &str, date: NaiveDate, rate: Decimal) -> Result<()> {
        let reference = self.reference.clone();
        let entry = self.entry_mut(code)?;
        let code = entry.currency.code().to_string();

        let is_reference = code == reference;
        if rate <= Decimal::ZERO || (is_reference && rate != Decimal::ONE) {
            return Err(CoreError::InvalidRate {
                code,
                rate: rate.to_string(),
            });
        }

        match entry.rates.insert(date, rate) {
            Some(previous) => debug!(%previous, "Replaced rate"),
            None => debug!(entries = entry.rates.len(), "Added rate"),
        }
        Ok(())
    }

    /// Get the rate of `code` in effect on `date`.
    ///
    /// Falls back to the earliest later rate when nothing is recorded on or
    /// before `date`. The reference currency is always 1.
    pub fn rate_on(&self, code: &str, date: NaiveDate) -> Result<Decimal> {
        let entry = self.entry(code)?;
        if entry.currency.code() == self.reference {
            return Ok(Decimal::ONE);
        }
        entry
            .rates
            .rate_on(date)
            .ok_or_else(|| CoreError::NoRateData(entry.currency.code().to_string()))
    }

    /// Convert `amount` into `target_code` using the rates in effect on `date`.
    pub fn convert(&self, amount: &Amount, target_code: &str, date: NaiveDate) -> Result<Amount> {
        self.convert_detailed(amount, target_code, date)
            .map(|conversion| conversion.output)
    }

    /// Convert and keep the rates that were applied.
    ///
    /// The result is rounded half-to-even to the target exponent. Converting
    /// into the amount's own currency performs no rate lookup.
    #[instrument(skip(self, amount), fields(from = ?amount.currency_code(), value = %amount.value()))]
    pub fn convert_detailed(&self, amount: &Amount, target_code: &str, date: NaiveDate) -> Result<Conversion> {
        let target = self.lookup(target_code)?;

        let source = match amount.currency() {
            Some(source) if source != &target => source.clone(),
            Some(_) => return Ok(Self::identity(amount.clone(), amount.clone(), date)),
            None => return Ok(Self::identity(amount.clone(), Amount::zero(target), date)),
        };

        let source_rate = self.rate_on(source.code(), date)?;
        let target_rate = self.rate_on(target.code(), date)?;
        let value = amount
            .value()
            .checked_mul(source_rate)
            .and_then(|v| v.checked_div(target_rate))
            .ok_or(CoreError::Overflow)?;
        let output = Amount::new(value, target)?;

        debug!(
            to = %target_code,
            %source_rate,
            %target_rate,
            output = %output,
            "Converted amount"
        );

        Ok(Conversion {
            input: amount.clone(),
            output,
            source_rate,
            target_rate,
            date,
        })
    }

    /// Parse text such as `"12.34"`, `"12.34 EUR"` or `"EUR 12.34"`.
    ///
    /// A currency code before or after the number wins over `default_code`.
    pub fn parse_amount(&self, text: &str, default_code: &str) -> Result<Amount> {
        let (number, code) = split_currency_code(text.trim());
        let currency = self.lookup(code.unwrap_or(default_code))?;
        Amount::parse(number, currency)
    }

    fn identity(input: Amount, output: Amount, date: NaiveDate) -> Conversion {
        Conversion {
            input,
            output,
            source_rate: Decimal::ONE,
            target_rate: Decimal::ONE,
            date,
        }
    }

    fn entry(&self, code: &str) -> Result<&CurrencyEntry> {
        self.entries
            .get(&code.trim().to_uppercase())
            .ok_or_else(|| CoreError::UnknownCurrency(code.to_string()))
    }

    fn entry_mut(&mut self, code: &str) -> Result<&mut CurrencyEntry> {
        self.entries
            .get_mut(&code.trim().to_uppercase())
            .ok_or_else(|| CoreError::UnknownCurrency(code.to_string()))
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_code(token: &str) -> bool {
    token.len() >= 3 && token.chars().all(|c| c.is_ascii_alphabetic())
}

fn split_currency_code(text: &str) -> (&str, Option<&str>) {
    if let Some((number, code)) = text.rsplit_once(char::is_whitespace) {
        if looks_like_code(code) {
            return (number.trim_end(), Some(code));
        }
    }
    if let Some((code, number)) = text.split_once(char::is_whitespace) {
        if looks_like_code(code) {
            return (number.trim_start(), Some(code));
        }
    }
    (text, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_registry() -> CurrencyRegistry {
        let mut registry = CurrencyRegistry::new();
        registry.register("USD", "$", 2).unwrap();
        registry.register("EUR", "€", 2).unwrap();
        registry.register("JPY", "¥", 0).unwrap();
        registry.add_rate("EUR", date(2024, 1, 1), dec!(1.10)).unwrap();
        registry.add_rate("EUR", date(2024, 2, 1), dec!(1.08)).unwrap();
        registry.add_rate("JPY", date(2024, 1, 1), dec!(0.0068)).unwrap();
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CurrencyRegistry::new();
        let cad = registry.register("cad", "C$", 2).unwrap();

        assert_eq!(cad.code(), "CAD");
        assert_eq!(registry.lookup("Cad").unwrap().code(), "CAD");
        assert!(Arc::ptr_eq(&cad, &registry.lookup("CAD").unwrap()));
        assert!(registry.contains("cad"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_currency() {
        let mut registry = CurrencyRegistry::new();
        registry.register("USD", "$", 2).unwrap();

        let result = registry.register("usd", "US$", 2);
        assert!(matches!(result, Err(CoreError::DuplicateCurrency(code)) if code == "USD"));
    }

    #[test]
    fn test_unknown_currency() {
        let mut registry = setup_registry();
        assert!(matches!(registry.lookup("XYZ"), Err(CoreError::UnknownCurrency(_))));
        assert!(matches!(
            registry.add_rate("XYZ", date(2024, 1, 1), dec!(1)),
            Err(CoreError::UnknownCurrency(_))
        ));
        assert!(matches!(
            registry.rate_on("XYZ", date(2024, 1, 1)),
            Err(CoreError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_invalid_rate() {
        let mut registry = setup_registry();
        for rate in [dec!(0), dec!(-1.5)] {
            assert!(matches!(
                registry.add_rate("EUR", date(2024, 3, 1), rate),
                Err(CoreError::InvalidRate { .. })
            ));
        }
        assert!(matches!(
            registry.add_rate("USD", date(2024, 3, 1), dec!(1.2)),
            Err(CoreError::InvalidRate { .. })
        ));
        assert!(registry.add_rate("USD", date(2024, 3, 1), Decimal::ONE).is_ok());
    }

    #[test]
    fn test_rate_on() {
        let registry = setup_registry();
        assert_eq!(registry.rate_on("EUR", date(2023, 6, 1)).unwrap(), dec!(1.10));
        assert_eq!(registry.rate_on("EUR", date(2024, 1, 15)).unwrap(), dec!(1.10));
        assert_eq!(registry.rate_on("eur", date(2024, 2, 1)).unwrap(), dec!(1.08));
        assert_eq!(registry.rate_on("EUR", date(2025, 1, 1)).unwrap(), dec!(1.08));
        assert_eq!(registry.rate_on("USD", date(2024, 1, 1)).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_no_rate_data() {
        let mut registry = setup_registry();
        registry.register("GBP", "£", 2).unwrap();
        assert!(matches!(
            registry.rate_on("GBP", date(2024, 1, 1)),
            Err(CoreError::NoRateData(code)) if code == "GBP"
        ));

        let gbp = Amount::from_minor(100, registry.lookup("GBP").unwrap());
        assert!(matches!(
            registry.convert(&gbp, "USD", date(2024, 1, 1)),
            Err(CoreError::NoRateData(_))
        ));
    }

    #[test]
    fn test_convert() {
        let registry = setup_registry();
        let eur = Amount::from_minor(100_000, registry.lookup("EUR").unwrap());

        let usd = registry.convert(&eur, "USD", date(2024, 2, 15)).unwrap();
        assert_eq!(usd.currency_code(), Some("USD"));
        assert_eq!(usd.minor_units(), 108_000);

        // 1000 EUR at 1.10 / 0.0068 = 161764.705... JPY -> 161765
        let jpy = registry.convert(&eur, "JPY", date(2024, 1, 10)).unwrap();
        assert_eq!(jpy.minor_units(), 161_765);
    }

    #[test]
    fn test_convert_rounds_half_to_even() {
        let mut registry = setup_registry();
        registry.register("XTS", "XTS", 0).unwrap();
        registry.add_rate("XTS", date(2024, 1, 1), dec!(2)).unwrap();

        // 1 XTS = 2 USD, so 1 USD = 0.5 XTS
        let usd = registry.lookup("USD").unwrap();
        let half = registry
            .convert(&Amount::from_minor(100, usd.clone()), "XTS", date(2024, 1, 1))
            .unwrap();
        assert_eq!(half.minor_units(), 0);

        let three_halves = registry
            .convert(&Amount::from_minor(300, usd), "XTS", date(2024, 1, 1))
            .unwrap();
        assert_eq!(three_halves.minor_units(), 2);
    }

    #[test]
    fn test_convert_overflow() {
        let mut registry = setup_registry();
        registry.add_rate("EUR", date(2024, 3, 1), dec!(0.5)).unwrap();

        let usd = registry.lookup("USD").unwrap();
        let huge = Amount::new(Decimal::from_i128_with_scale(5 * 10i128.pow(26), 0), usd).unwrap();
        assert!(matches!(
            registry.convert(&huge, "EUR", date(2024, 3, 1)),
            Err(CoreError::Overflow)
        ));
    }

    #[test]
    fn test_convert_same_currency_and_none() {
        let mut registry = setup_registry();
        registry.register("GBP", "£", 2).unwrap();
        let gbp = Amount::from_minor(1234, registry.lookup("GBP").unwrap());

        // No rate needed when the currency does not change
        let same = registry.convert(&gbp, "gbp", date(2024, 1, 1)).unwrap();
        assert_eq!(same, gbp);

        let zero = registry.convert(&Amount::none(), "EUR", date(2024, 1, 1)).unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero.currency_code(), Some("EUR"));
    }

    #[test]
    fn test_convert_detailed() {
        let registry = setup_registry();
        let eur = Amount::from_minor(100_000, registry.lookup("EUR").unwrap());
        let conversion = registry
            .convert_detailed(&eur, "USD", date(2024, 1, 5))
            .unwrap();

        assert_eq!(conversion.source_rate, dec!(1.10));
        assert_eq!(conversion.target_rate, Decimal::ONE);
        assert_eq!(conversion.effective_rate(), dec!(1.1));
        assert_eq!(conversion.date, date(2024, 1, 5));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = CurrencyRegistry::with_builtin_currencies().unwrap();
        assert_eq!(registry.reference_currency(), "USD");
        assert_eq!(registry.lookup("jpy").unwrap().exponent(), 0);
        assert_eq!(registry.lookup("KWD").unwrap().exponent(), 3);

        let codes: Vec<_> = registry.currencies().iter().map(|c| c.code().to_string()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_custom_reference_currency() {
        let config = FxConfig {
            reference_currency: "cad".to_string(),
            builtin_currencies: true,
        };
        let mut registry = CurrencyRegistry::with_config(&config).unwrap();
        registry.add_rate("USD", date(2024, 1, 1), dec!(1.35)).unwrap();

        assert_eq!(registry.reference_currency(), "CAD");
        assert_eq!(registry.rate_on("CAD", date(2024, 1, 1)).unwrap(), Decimal::ONE);

        let usd = Amount::from_minor(10_000, registry.lookup("USD").unwrap());
        let cad = registry.convert(&usd, "CAD", date(2024, 1, 1)).unwrap();
        assert_eq!(cad.minor_units(), 13_500);
    }

    #[test]
    fn test_parse_amount() {
        let registry = setup_registry();

        let plain = registry.parse_amount("12.34", "USD").unwrap();
        assert_eq!(plain.currency_code(), Some("USD"));
        assert_eq!(plain.minor_units(), 1234);

        let suffixed = registry.parse_amount("12.34 eur", "USD").unwrap();
        assert_eq!(suffixed.currency_code(), Some("EUR"));

        let prefixed = registry.parse_amount("JPY 1,500", "USD").unwrap();
        assert_eq!(prefixed.currency_code(), Some("JPY"));
        assert_eq!(prefixed.minor_units(), 1500);

        assert!(matches!(
            registry.parse_amount("5 XYZ", "USD"),
            Err(CoreError::UnknownCurrency(_))
        ));
        assert!(matches!(
            registry.parse_amount("five", "USD"),
            Err(CoreError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_shared_registry() {
        let shared = setup_registry().into_shared();
        shared
            .write()
            .add_rate("EUR", date(2024, 3, 1), dec!(1.09))
            .unwrap();
        assert_eq!(
            shared.read().rate_on("EUR", date(2024, 3, 2)).unwrap(),
            dec!(1.09)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_convert_round_trip_within_one_unit(
            minor in -10_000_000_000i64..10_000_000_000,
            rate in 1_000i64..=10_000,
        ) {
            let mut registry = CurrencyRegistry::new();
            let usd = registry.register("USD", "$", 2).unwrap();
            registry.register("EUR", "€", 2).unwrap();
            let day = date(2024, 1, 1);
            registry.add_rate("EUR", day, Decimal::new(rate, 4)).unwrap();

            let original = Amount::from_minor(minor, usd);
            let there = registry.convert(&original, "EUR", day).unwrap();
            let back = registry.convert(&there, "USD", day).unwrap();

            prop_assert!((back.minor_units() - original.minor_units()).abs() <= 1);
        }
    }
}
