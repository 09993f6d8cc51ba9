//! The free-text expense category, normalized at construction.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CategoryError(String);

impl Display for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for CategoryError {}

/// Represents an expense category, for example, `Grocery`.
///
/// Categories are free text but are normalized when constructed: surrounding whitespace is
/// trimmed and the text is title-cased, so ` grocery ` and `GROCERY` both become `Grocery`.
/// An empty (or all-whitespace) category is rejected.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Category(String);

impl Category {
    pub fn new(s: impl AsRef<str>) -> Result<Self, CategoryError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CategoryError(String::from(
                "A category must not be empty",
            )));
        }
        Ok(Self(title_case(trimmed)))
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::new(s)
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Category::new(s).map_err(serde::de::Error::custom)
    }
}

/// Uppercases the first letter of every word and lowercases the rest. A "word" starts after any
/// non-alphabetic character, so `credit-card fuel` becomes `Credit-Card Fuel`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
