//! Exact monetary amounts.
//!
//! An [`Amount`] is a `Decimal` whose scale always equals its currency's
//! exponent, so the mantissa is the magnitude in minor units and no binary
//! fraction error can creep in. All re-rounding uses round-half-to-even.

use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use crate::currency::{CurrencyRef, MAX_EXPONENT};
use crate::error::{CoreError, Result};

/// Round `value` half-to-even to `places` and pin its scale to exactly `places`.
///
/// Fails with [`CoreError::Overflow`] when the mantissa cannot carry that many
/// decimals: `Decimal::rescale` would otherwise settle on a smaller scale.
pub fn quantize(value: Decimal, places: u32) -> Result<Decimal> {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(places);
    if rounded.scale() != places {
        return Err(CoreError::Overflow);
    }
    Ok(rounded)
}

/// A monetary amount tied to one currency.
///
/// The only currency-less amount is the neutral zero built by
/// [`Amount::none`]. It acts as an identity for addition with any currency.
#[derive(Debug, Clone)]
pub struct Amount {
    value: Decimal,
    currency: Option<CurrencyRef>,
}

impl Amount {
    /// Create an amount, rounding `value` to the currency's exponent.
    pub fn new(value: Decimal, currency: CurrencyRef) -> Result<Self> {
        Ok(Self {
            value: quantize(value, currency.exponent())?,
            currency: Some(currency),
        })
    }

    /// Create an amount from its magnitude in minor units (cents for USD).
    pub fn from_minor(minor: i64, currency: CurrencyRef) -> Self {
        Self {
            value: Decimal::new(minor, currency.exponent()),
            currency: Some(currency),
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: CurrencyRef) -> Self {
        Self::from_minor(0, currency)
    }

    /// The neutral "no amount" value, with no currency.
    pub fn none() -> Self {
        Self {
            value: Decimal::ZERO,
            currency: None,
        }
    }

    /// Parse user input such as `"1,234.56"`, `"-10.5"` or `"(10.50)"`.
    ///
    /// The currency symbol may appear in the text. Extra decimals are rounded
    /// half-to-even to the currency's exponent.
    pub fn parse(text: &str, currency: CurrencyRef) -> Result<Self> {
        let symbol = currency.symbol();
        let stripped = if !symbol.is_empty() && text.contains(symbol) {
            text.replacen(symbol, "", 1)
        } else {
            text.to_string()
        };
        let value = parse_decimal(&stripped).map_err(|_| CoreError::InvalidAmount(text.to_string()))?;
        Self::new(value, currency)
    }

    /// Get the exact decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Get the magnitude in minor units.
    pub fn minor_units(&self) -> i128 {
        self.value.mantissa()
    }

    /// Get the currency, `None` for the neutral zero.
    pub fn currency(&self) -> Option<&CurrencyRef> {
        self.currency.as_ref()
    }

    /// Get the currency code, `None` for the neutral zero.
    pub fn currency_code(&self) -> Option<&str> {
        self.currency.as_deref().map(|c| c.code())
    }

    /// Check if this is the currency-less neutral zero.
    pub fn is_none(&self) -> bool {
        self.currency.is_none()
    }

    /// Check if the amount is zero, whatever its currency.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Check if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Get the absolute value.
    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            currency: self.currency.clone(),
        }
    }

    /// Flip the sign. Currency is unchanged.
    pub fn negate(&self) -> Self {
        if self.value.is_zero() {
            return self.clone();
        }
        Self {
            value: -self.value,
            currency: self.currency.clone(),
        }
    }

    /// Add two amounts of the same currency.
    pub fn checked_add(&self, other: &Amount) -> Result<Amount> {
        let currency = self.shared_currency(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .ok_or(CoreError::Overflow)?;
        Self::with_scale(value, currency)
    }

    /// Subtract `other` from this amount. Both must share a currency.
    pub fn checked_sub(&self, other: &Amount) -> Result<Amount> {
        let currency = self.shared_currency(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or(CoreError::Overflow)?;
        Self::with_scale(value, currency)
    }

    /// Scale by `factor`, rounding half-to-even to the currency's exponent.
    pub fn multiply(&self, factor: Decimal) -> Result<Amount> {
        let value = self.value.checked_mul(factor).ok_or(CoreError::Overflow)?;
        Self::with_scale(value, self.currency.clone())
    }

    /// Order two amounts of the same currency.
    ///
    /// Fails when the currencies differ, unless one side is the neutral zero.
    pub fn compare(&self, other: &Amount) -> Result<Ordering> {
        self.shared_currency(other)?;
        Ok(self.value.cmp(&other.value))
    }

    /// Render the amount for display.
    pub fn format(&self, options: &FormatOptions) -> String {
        let places = match options.decimal_places {
            DecimalPlaces::CurrencyDefault => self.exponent(),
            DecimalPlaces::Fixed(places) => places.min(MAX_EXPONENT),
        };
        // Padding past what the mantissa can carry shows the exact value instead.
        let shown = quantize(self.value, places).unwrap_or(self.value);
        let digits = shown.abs().to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + 8);
        if shown < Decimal::ZERO {
            out.push('-');
        }
        if options.show_symbol {
            if let Some(currency) = &self.currency {
                out.push_str(currency.symbol());
                out.push(' ');
            }
        }
        if options.thousands_separator {
            out.push_str(&group_thousands(integer));
        } else {
            out.push_str(integer);
        }
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }

    fn exponent(&self) -> u32 {
        self.currency.as_ref().map_or(0, |c| c.exponent())
    }

    fn with_scale(value: Decimal, currency: Option<CurrencyRef>) -> Result<Self> {
        let places = currency.as_ref().map_or(0, |c| c.exponent());
        Ok(Self {
            value: quantize(value, places)?,
            currency,
        })
    }

    fn shared_currency(&self, other: &Amount) -> Result<Option<CurrencyRef>> {
        match (&self.currency, &other.currency) {
            (Some(ours), Some(theirs)) if ours == theirs => Ok(Some(ours.clone())),
            (Some(ours), Some(theirs)) => Err(CoreError::mismatch(ours.code(), theirs.code())),
            (Some(currency), None) | (None, Some(currency)) => Ok(Some(currency.clone())),
            (None, None) => Ok(None),
        }
    }

    // Every zero shares the same key so that "no value" checks match across currencies.
    fn key(&self) -> (Option<&str>, Decimal) {
        if self.value.is_zero() {
            (None, Decimal::ZERO)
        } else {
            (self.currency_code(), self.value)
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Amount {}

impl Hash for Amount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Key ordering: zero first, then by currency code, then by value.
///
/// Use [`Amount::compare`] for checked, same-currency comparisons.
impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(currency) => write!(f, "{} {}", self.value, currency.code()),
            None => write!(f, "0"),
        }
    }
}

impl Add for Amount {
    type Output = Result<Amount>;

    fn add(self, other: Amount) -> Self::Output {
        self.checked_add(&other)
    }
}

impl Sub for Amount {
    type Output = Result<Amount>;

    fn sub(self, other: Amount) -> Self::Output {
        self.checked_sub(&other)
    }
}

impl Mul<Decimal> for Amount {
    type Output = Result<Amount>;

    fn mul(self, factor: Decimal) -> Self::Output {
        self.multiply(factor)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

/// How many decimals to show when formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalPlaces {
    /// Use the currency's exponent.
    #[default]
    CurrencyDefault,
    /// Show exactly this many decimals, rounding half-to-even.
    Fixed(u32),
}

/// Display options for [`Amount::format`].
///
/// The default renders `Amount(1050, USD)` as `"10.50"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    /// Prefix the currency symbol.
    pub show_symbol: bool,
    /// Decimal places override.
    pub decimal_places: DecimalPlaces,
    /// Group integer digits by thousands with `,`.
    pub thousands_separator: bool,
}

impl FormatOptions {
    /// Show the currency symbol.
    pub fn with_symbol(mut self) -> Self {
        self.show_symbol = true;
        self
    }

    /// Show a fixed number of decimals.
    pub fn with_places(mut self, places: u32) -> Self {
        self.decimal_places = DecimalPlaces::Fixed(places);
        self
    }

    /// Group thousands.
    pub fn with_grouping(mut self) -> Self {
        self.thousands_separator = true;
        self
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Read a plain decimal number, tolerating grouping separators, a leading
/// sign and accounting-style parentheses for negatives.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let invalid = || CoreError::InvalidAmount(text.to_string());

    let mut body = text.trim();
    let negative;
    if let Some(inner) = body.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        // Parentheses are the sign; a sign inside them is ambiguous.
        body = inner.trim();
        if body.starts_with(['-', '+']) {
            return Err(invalid());
        }
        negative = true;
    } else if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest.trim_start();
    } else {
        negative = false;
        if let Some(rest) = body.strip_prefix('+') {
            body = rest.trim_start();
        }
    }

    let mut cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\'' | '_'))
        .collect();
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }
    let well_formed = !cleaned.is_empty()
        && cleaned.chars().all(|c| c.is_ascii_digit() || c == '.')
        && cleaned.matches('.').count() <= 1;
    if !well_formed {
        return Err(invalid());
    }

    let value: Decimal = cleaned.parse().map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}
