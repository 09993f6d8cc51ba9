//! Month filtering and aggregation over the expense data.

use crate::model::{Category, Expense, Member};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ParseMonthKeyError(String);

impl Display for ParseMonthKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for ParseMonthKeyError {}

/// A calendar year and month, e.g. `2024-01`. This is the key an expense's date is truncated to
/// for filtering and reporting.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a `MonthKey`, validating that `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, ParseMonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(ParseMonthKeyError(format!(
                "The month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month that `date` falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseMonthKeyError(format!("A month must look like YYYY-MM, got '{s}'"));
        let (year, month) = s.trim().split_once('-').ok_or_else(error)?;
        let year: i32 = year.parse().map_err(|_| error())?;
        let month: u32 = month.parse().map_err(|_| error())?;
        MonthKey::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MonthKey::from_str(&s).map_err(D::Error::custom)
    }
}

/// The distinct months that have expenses, most recent first. This is the set of months a user
/// can select for reporting.
pub fn available_months(expenses: &[Expense]) -> Vec<MonthKey> {
    let months: std::collections::BTreeSet<MonthKey> = expenses
        .iter()
        .map(|expense| MonthKey::from_date(expense.date()))
        .collect();
    months.into_iter().rev().collect()
}

/// One category's share of a month's spending.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// One member's share of a month's spending.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MemberTotal {
    pub member: Member,
    pub total: Decimal,
}

/// The aggregates for one month's expenses.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthSummary {
    /// The month the summary covers.
    pub month: MonthKey,
    /// How many expenses fell in the month.
    pub count: usize,
    /// The sum of the amounts; zero for an empty month.
    pub total: Decimal,
    /// The arithmetic mean of the amounts; `None` for an empty month.
    pub mean: Option<Decimal>,
    /// Per-category sums, largest first.
    pub by_category: Vec<CategoryTotal>,
    /// Per-member sums, largest first.
    pub by_member: Vec<MemberTotal>,
}

/// Computes the aggregates for the expenses whose date falls in `month`. Expenses outside the
/// month are ignored.
pub fn summarize(expenses: &[Expense], month: MonthKey) -> MonthSummary {
    let mut count = 0usize;
    let mut total = Decimal::ZERO;
    let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    let mut by_member: BTreeMap<Member, Decimal> = BTreeMap::new();

    for expense in expenses {
        if MonthKey::from_date(expense.date()) != month {
            continue;
        }
        let amount = expense.amount().value();
        count += 1;
        total += amount;
        *by_category.entry(expense.category().clone()).or_default() += amount;
        *by_member.entry(expense.member()).or_default() += amount;
    }

    let mean = if count == 0 {
        None
    } else {
        Some(total / Decimal::from(count))
    };

    // BTreeMap iteration is ordered by key, and the sort below is stable, so ties keep their
    // key order.
    let mut by_category: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    by_category.sort_by(|a, b| b.total.cmp(&a.total));

    let mut by_member: Vec<MemberTotal> = by_member
        .into_iter()
        .map(|(member, total)| MemberTotal { member, total })
        .collect();
    by_member.sort_by(|a, b| b.total.cmp(&a.total));

    MonthSummary {
        month,
        count,
        total,
        mean,
        by_category,
        by_member,
    }
}
