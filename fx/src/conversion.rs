//! Currency conversion records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallybook_common::Amount;

/// Represents a completed currency conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Input amount.
    pub input: Amount,
    /// Output amount, rounded to the target exponent.
    pub output: Amount,
    /// Reference-currency rate of the input currency on `date`.
    pub source_rate: Decimal,
    /// Reference-currency rate of the target currency on `date`.
    pub target_rate: Decimal,
    /// Date the rates were looked up for.
    pub date: NaiveDate,
}

impl Conversion {
    /// Get the cross rate applied: target units per source unit.
    pub fn cross_rate(&self) -> Decimal {
        self.source_rate / self.target_rate
    }

    /// Get the effective rate after rounding.
    pub fn effective_rate(&self) -> Decimal {
        if self.input.value().is_zero() {
            return Decimal::ZERO;
        }
        self.output.value() / self.input.value()
    }

    /// Check if no currency change took place.
    pub fn is_identity(&self) -> bool {
        self.input.currency_code() == self.output.currency_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tallybook_common::Currency;

    #[test]
    fn test_conversion_rates() {
        let usd = Arc::new(Currency::new("USD", "$", 2).unwrap());
        let eur = Arc::new(Currency::new("EUR", "€", 2).unwrap());
        let conversion = Conversion {
            input: Amount::from_minor(100_000, eur),
            output: Amount::from_minor(108_000, usd),
            source_rate: dec!(1.08),
            target_rate: Decimal::ONE,
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };

        assert_eq!(conversion.cross_rate(), dec!(1.08));
        assert_eq!(conversion.effective_rate(), dec!(1.08));
        assert!(!conversion.is_identity());
    }
}
