//! Amount type for handling monetary values with an optional currency prefix.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing cell values
//! that may or may not include a rupee prefix and thousands separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a rupee amount.
///
/// This type wraps `Decimal` and provides custom serialization/deserialization to handle amounts
/// that may be formatted with or without a currency prefix or thousands separators. Amounts are
/// persisted to the sheet as plain two-decimal numbers and displayed as, e.g., `Rs. 1,234.50`.
///
/// # Examples
///
/// Parsing a plain cell value:
/// ```
/// # use family_budget::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("12.5").unwrap();
/// assert_eq!(amount.to_string(), "Rs. 12.50");
/// ```
///
/// Parsing a formatted value:
/// ```
/// # use family_budget::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("Rs. 1,000").unwrap();
/// assert_eq!(amount.to_sheet_value(), "1000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative() && !self.is_zero()
    }

    /// The plain, two-decimal string written to the sheet, e.g. `1000.00`.
    pub fn to_sheet_value(&self) -> String {
        let mut value = self.0;
        if value.scale() < 2 {
            value.rescale(2);
        }
        value.to_string()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Remove the currency prefix if present: "Rs. 50", "Rs 50" and "₨50" are all accepted.
        let without_prefix = trimmed
            .strip_prefix("Rs.")
            .or_else(|| trimmed.strip_prefix("Rs"))
            .or_else(|| trimmed.strip_prefix('₨'))
            .unwrap_or(trimmed)
            .trim_start();

        // Remove commas (thousands separators)
        let without_commas = without_prefix.replace(',', "");

        // Parse the decimal value
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value())
        };
        write!(
            f,
            "{sign}Rs. {}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize in the plain form written to the sheet
        serializer.serialize_str(&self.to_sheet_value())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("12.5").unwrap();
        assert_eq!(amount.value(), dec!(12.5));
    }

    #[test]
    fn test_parse_with_prefix() {
        let amount = Amount::from_str("Rs. 50.00").unwrap();
        assert_eq!(amount.value(), dec!(50.00));
    }

    #[test]
    fn test_parse_with_bare_prefix() {
        let amount = Amount::from_str("Rs 50").unwrap();
        assert_eq!(amount.value(), dec!(50));
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec!(1234567.89));
    }

    #[test]
    fn test_parse_with_prefix_and_commas() {
        let amount = Amount::from_str("Rs. 1,000").unwrap();
        assert_eq!(amount.value(), dec!(1000));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  50.00  ").unwrap();
        assert_eq!(amount.value(), dec!(50.00));
    }

    #[test]
    fn test_parse_empty_string_fails() {
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_parse_non_numeric_fails() {
        assert!(Amount::from_str("abc").is_err());
    }

    #[test]
    fn test_display() {
        let amount = Amount::new(dec!(1234.5));
        assert_eq!(amount.to_string(), "Rs. 1,234.50");
    }

    #[test]
    fn test_display_zero() {
        let amount = Amount::new(Decimal::ZERO);
        assert_eq!(amount.to_string(), "Rs. 0.00");
    }

    #[test]
    fn test_sheet_value_pads_to_two_decimals() {
        assert_eq!(Amount::new(dec!(12.5)).to_sheet_value(), "12.50");
        assert_eq!(Amount::new(dec!(10)).to_sheet_value(), "10.00");
    }

    #[test]
    fn test_sheet_value_keeps_extra_precision() {
        assert_eq!(Amount::new(dec!(0.125)).to_sheet_value(), "0.125");
    }

    #[test]
    fn test_sheet_value_reparses_to_same_value() {
        let original = Amount::new(dec!(1234.56));
        let reparsed = Amount::from_str(&original.to_sheet_value()).unwrap();
        assert_eq!(original.value(), reparsed.value());
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::new(dec!(50));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"50.00\"");
    }

    #[test]
    fn test_deserialize() {
        let amount: Amount = serde_json::from_str("\"Rs. 1,250.75\"").unwrap();
        assert_eq!(amount.value(), dec!(1250.75));
    }

    #[test]
    fn test_is_positive() {
        assert!(Amount::new(dec!(0.01)).is_positive());
        assert!(!Amount::new(Decimal::ZERO).is_positive());
        assert!(!Amount::new(dec!(-5)).is_positive());
    }

    #[test]
    fn test_ordering() {
        assert!(Amount::new(dec!(30)) < Amount::new(dec!(50)));
    }
}
