//! Money amounts and currency display.
//!
//! Amounts are kept as integer hundredths so that subtotals and totals are
//! exact. Conversion from floating-point or user-typed text rounds half away
//! from zero to the nearest hundredth, and zero-decimal currencies round the
//! same way to whole units when displayed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Hundredths per major unit.
const SCALE: i64 = 100;

/// Supported display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    USD,
    /// The storefront's primary currency and the default for new users.
    #[default]
    JOD,
    /// Zero-decimal currency.
    SP,
}

impl Currency {
    /// Get the currency code (e.g., "JOD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::JOD => "JOD",
            Currency::SP => "SP",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::JOD => "JOD",
            Currency::SP => "SP",
        }
    }

    /// Get the number of decimal places shown for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::SP => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "JOD" => Some(Currency::JOD),
            "SP" => Some(Currency::SP),
            _ => None,
        }
    }

    /// Parse a currency code, falling back to USD (symbol `$`) for codes
    /// this client doesn't know.
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or(Currency::USD)
    }

    /// Format the amount without a symbol.
    ///
    /// ```
    /// use munjiz_commerce::money::{Currency, Money};
    /// assert_eq!(Currency::USD.format_value(Money::new(1250)), "12.50");
    /// assert_eq!(Currency::SP.format_value(Money::new(1250)), "13");
    /// ```
    pub fn format_value(&self, amount: Money) -> String {
        match self.decimal_places() {
            0 => amount.round_to_units().to_string(),
            _ => amount.to_string(),
        }
    }

    /// Format the amount with its symbol.
    ///
    /// JOD is written with the symbol directly against the number
    /// (`JOD12.50`); every other currency puts a space between them
    /// (`$ 12.50`, `SP 13`). Existing receipts rely on this layout.
    pub fn format(&self, amount: Money) -> String {
        let value = self.format_value(amount);
        match self {
            Currency::JOD => format!("{}{}", self.symbol(), value),
            _ => format!("{} {}", self.symbol(), value),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Symbol for an arbitrary currency code; unknown codes get `$`.
pub fn currency_symbol(code: &str) -> &'static str {
    Currency::resolve(code).symbol()
}

/// Format `amount` without a symbol for an arbitrary currency code.
pub fn format_price_value(amount: Money, code: &str) -> String {
    Currency::resolve(code).format_value(amount)
}

/// Format `amount` with its symbol for an arbitrary currency code.
pub fn format_price(amount: Money, code: &str) -> String {
    Currency::resolve(code).format(amount)
}

/// A monetary amount in hundredths of the major unit.
///
/// Carries no currency: the cart and the totals work in raw amounts, and the
/// currency is only chosen when rendering. On the wire an amount is a JSON
/// number of major units (`12.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in hundredths.
    pub amount_cents: i64,
}

impl Money {
    /// Create a value from hundredths.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Zero.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Create a value from a decimal amount, rounding half away from zero.
    /// Non-finite input becomes zero.
    ///
    /// ```
    /// use munjiz_commerce::money::Money;
    /// assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
    /// assert_eq!(Money::from_decimal(f64::NAN), Money::zero());
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        // `as` saturates at the i64 bounds.
        Self::new((amount * SCALE as f64).round() as i64)
    }

    /// Parse user-typed text the way a numeric form field does: leading
    /// whitespace is skipped and the longest numeric prefix is used, so
    /// `"12.5 JOD"` reads as 12.50. Text with no numeric prefix, and
    /// anything that overflows to infinity, reads as zero.
    pub fn parse_lenient(text: &str) -> Self {
        parse_float_prefix(text)
            .map(Self::from_decimal)
            .unwrap_or_default()
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / SCALE as f64
    }

    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// The amount, or zero if it is negative.
    pub fn non_negative(self) -> Self {
        self.max(Self::zero())
    }

    /// Multiply by a quantity, saturating on overflow.
    pub fn times(&self, quantity: u64) -> Money {
        let factor = i64::try_from(quantity).unwrap_or(i64::MAX);
        Money::new(self.amount_cents.saturating_mul(factor))
    }

    /// Checked addition.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::new)
    }

    /// Whole major units, rounding half away from zero.
    pub fn round_to_units(&self) -> i64 {
        let units = (self.amount_cents.unsigned_abs() + (SCALE as u64 / 2)) / SCALE as u64;
        let units = i64::try_from(units).unwrap_or(i64::MAX);
        if self.is_negative() {
            -units
        } else {
            units
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_sub(other.amount_cents))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Two-decimal rendering without a symbol (e.g. `"12.50"`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        let scale = SCALE as u64;
        write!(f, "{}{}.{:02}", sign, abs / scale, abs % scale)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount))
    }
}

/// Longest prefix of `text` (after leading whitespace) that reads as a
/// decimal number with optional sign, fraction and exponent.
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let negative = bytes.first() == Some(&b'-');
    let int_start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(int_start);
    let mut end = int_end;

    let mut frac = "";
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        frac = &s[int_end + 1..frac_end];
        if frac_end > int_end + 1 || int_end > int_start {
            end = frac_end;
        }
    }
    let int = &s[int_start..int_end];
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign_end = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(sign_end);
        if exp_end > sign_end {
            exponent = &s[end + 1..exp_end];
        }
    }

    let mut normalized = String::with_capacity(end + 4);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int.is_empty() { "0" } else { int });
    if !frac.is_empty() {
        normalized.push('.');
        normalized.push_str(frac);
    }
    if !exponent.is_empty() {
        normalized.push('e');
        normalized.push_str(exponent);
    }

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
        assert_eq!(Money::from_decimal(10.0).amount_cents, 1000);
        assert_eq!(Money::from_decimal(0.125).amount_cents, 13);
        assert_eq!(Money::from_decimal(-0.125).amount_cents, -13);
        assert_eq!(Money::from_decimal(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Money::parse_lenient("12.5"), Money::new(1250));
        assert_eq!(Money::parse_lenient("  7"), Money::new(700));
        assert_eq!(Money::parse_lenient("12.5 JOD"), Money::new(1250));
        assert_eq!(Money::parse_lenient(".5"), Money::new(50));
        assert_eq!(Money::parse_lenient("3."), Money::new(300));
        assert_eq!(Money::parse_lenient("1e2"), Money::new(10000));
        assert_eq!(Money::parse_lenient("2e"), Money::new(200));
        assert_eq!(Money::parse_lenient("-4"), Money::new(-400));
    }

    #[test]
    fn test_parse_lenient_garbage_is_zero() {
        for text in ["", "   ", "abc", ".", "-", "NaN", "Infinity", "1e999", "$5"] {
            assert_eq!(Money::parse_lenient(text), Money::zero(), "input {text:?}");
        }
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(1250).to_string(), "12.50");
        assert_eq!(Money::new(5).to_string(), "0.05");
        assert_eq!(Money::new(-1250).to_string(), "-12.50");
    }

    #[test]
    fn test_round_to_units_half_away_from_zero() {
        assert_eq!(Money::new(1249).round_to_units(), 12);
        assert_eq!(Money::new(1250).round_to_units(), 13);
        assert_eq!(Money::new(1350).round_to_units(), 14);
        assert_eq!(Money::new(-1250).round_to_units(), -13);
    }

    #[test]
    fn test_saturating_arithmetic() {
        let max = Money::new(i64::MAX);
        assert_eq!(max + Money::new(1), max);
        assert_eq!(max.times(2), max);
        assert_eq!(Money::new(1000).times(3), Money::new(3000));
        assert!(max.checked_add(Money::new(1)).is_none());
    }

    #[test]
    fn test_money_serde_uses_major_units() {
        let json = serde_json::to_string(&Money::new(1250)).unwrap();
        assert_eq!(json, "12.5");
        let back: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(back, Money::new(1250));
        let int: Money = serde_json::from_str("30").unwrap();
        assert_eq!(int, Money::new(3000));
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(currency_symbol("USD"), "$");
        assert_eq!(currency_symbol("JOD"), "JOD");
        assert_eq!(currency_symbol("SP"), "SP");
        assert_eq!(currency_symbol("EUR"), "$");
    }

    #[test]
    fn test_format_price_values() {
        assert_eq!(format_price_value(Money::new(1250), "USD"), "12.50");
        assert_eq!(format_price_value(Money::new(1200), "JOD"), "12.00");
        assert_eq!(format_price_value(Money::new(1200), "SP"), "12");
        assert_eq!(format_price_value(Money::new(1250), "SP"), "13");
    }

    /// JOD is the only currency written without a space after the symbol.
    /// This irregular layout is fixed; receipts already printed use it.
    #[test]
    fn test_format_price_symbol_placement_is_irregular() {
        assert_eq!(format_price(Money::new(1250), "JOD"), "JOD12.50");
        assert_eq!(format_price(Money::new(1250), "USD"), "$ 12.50");
        assert_eq!(format_price(Money::new(1250), "SP"), "SP 13");
        assert_eq!(format_price(Money::new(1250), "XYZ"), "$ 12.50");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("jod"), Some(Currency::JOD));
        assert_eq!(Currency::from_code(" SP "), Some(Currency::SP));
        assert_eq!(Currency::from_code("EUR"), None);
        assert_eq!(Currency::default(), Currency::JOD);
    }
}
