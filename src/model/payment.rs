//! The fixed set of payment modes an expense can be recorded with.

use serde::{Deserialize, Serialize};

/// Represents how an expense was paid. The serialized form is what appears in the sheet's
/// `Payment_Mode` column, including the space in `Credit Card`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum PaymentMode {
    #[default]
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Online,
}

serde_plain::derive_display_from_serialize!(PaymentMode);
serde_plain::derive_fromstr_from_deserialize!(PaymentMode);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display() {
        assert_eq!(PaymentMode::Cash.to_string(), "Cash");
        assert_eq!(PaymentMode::CreditCard.to_string(), "Credit Card");
        assert_eq!(PaymentMode::Online.to_string(), "Online");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            PaymentMode::from_str("Credit Card").unwrap(),
            PaymentMode::CreditCard
        );
        assert!(PaymentMode::from_str("Cheque").is_err());
    }
}
