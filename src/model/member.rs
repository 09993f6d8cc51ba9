//! The fixed set of household members an expense can be recorded against.

use serde::{Deserialize, Serialize};

/// Represents the family member who spent the money.
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
pub enum Member {
    #[default]
    Husnain,
    Brother,
    Father,
    Mother,
}

serde_plain::derive_display_from_serialize!(Member);
serde_plain::derive_fromstr_from_deserialize!(Member);

impl Member {
    /// All members, in the order they are offered as form choices.
    pub const ALL: [Member; 4] = [
        Member::Husnain,
        Member::Brother,
        Member::Father,
        Member::Mother,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display() {
        assert_eq!(Member::Husnain.to_string(), "Husnain");
        assert_eq!(Member::Mother.to_string(), "Mother");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Member::from_str("Father").unwrap(), Member::Father);
        assert!(Member::from_str("Uncle").is_err());
    }

    #[test]
    fn test_all_round_trips() {
        for member in Member::ALL {
            assert_eq!(Member::from_str(&member.to_string()).unwrap(), member);
        }
    }
}
