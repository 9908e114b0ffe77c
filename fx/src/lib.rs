//! Tallybook FX
//!
//! Currency registry with historical exchange rates and currency conversion.
//!
//! # Features
//!
//! - Case-insensitive currency registration and lookup
//! - Dated rate tables with nearest-known-rate fallback
//! - Conversion with round-half-to-even into the target exponent
//! - A built-in table of common ISO 4217 currencies
//!
//! # Example
//!
//! ```rust,ignore
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use tallybook_common::Amount;
//! use tallybook_fx::CurrencyRegistry;
//!
//! let mut registry = CurrencyRegistry::with_builtin_currencies()?;
//! let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! registry.add_rate("EUR", date, dec!(1.08))?;
//!
//! let usd = Amount::from_minor(10_800, registry.lookup("USD")?);
//! let eur = registry.convert(&usd, "EUR", date)?;
//! assert_eq!(eur.minor_units(), 10_000);
//! ```

pub mod builtin;
pub mod config;
pub mod conversion;
pub mod rates;
pub mod registry;

pub use config::FxConfig;
pub use conversion::Conversion;
pub use rates::{RateEntry, RateTable};
pub use registry::{CurrencyRegistry, SharedRegistry};
