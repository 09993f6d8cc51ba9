use crate::model::{date, Amount, Category, Member, PaymentMode};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a single expense row from the sheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    member: Member,
    amount: Amount,
    category: Category,
    payment_mode: PaymentMode,
    date: NaiveDate,
    deadline: Option<NaiveDate>,
}

impl Expense {
    pub fn new(
        member: Member,
        amount: Amount,
        category: Category,
        payment_mode: PaymentMode,
        date: NaiveDate,
        deadline: Option<NaiveDate>,
    ) -> Self {
        Self {
            member,
            amount,
            category,
            payment_mode,
            date,
            deadline,
        }
    }

    pub fn member(&self) -> Member {
        self.member
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// The cell values for this expense in sheet column order. Dates are written in the fixed
    /// sheet format; a missing deadline is written as an empty string.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.member.to_string(),
            self.amount.to_sheet_value(),
            self.category.to_string(),
            self.payment_mode.to_string(),
            date::to_sheet_value(Some(self.date)),
            date::to_sheet_value(self.deadline),
        ]
    }
}

/// Represents the expense data from the sheet.
///
/// Rows that could not be parsed into an [`Expense`] are not represented here; they are counted
/// in `dropped` so the caller can surface a diagnostic instead of losing them silently.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Expenses {
    data: Vec<Expense>,
    dropped: usize,
}

impl Expenses {
    /// Given the downloaded data from a sheet, parse the header row and the data rows into an
    /// `Expenses` structure.
    ///
    /// The first row must be the header row; columns are located by header name, so the column
    /// order in the sheet does not matter. An empty data set parses to an empty `Expenses`.
    /// Data rows that fail to parse (a missing or non-numeric amount, an unparseable date, an
    /// empty category, or an unknown member or payment mode) are dropped and counted; rows that
    /// are entirely empty are ignored without being counted.
    pub fn parse<S, R>(sheet_data: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = sheet_data.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
            None => return Ok(Self::default()),
        };
        let columns = Columns::locate(&headers)?;

        let mut data = Vec::new();
        let mut dropped = 0;
        for row in rows {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            match columns.parse_row(&values) {
                Some(expense) => data.push(expense),
                None => dropped += 1,
            }
        }
        Ok(Self { data, dropped })
    }

    /// The parsed expenses, in sheet row order.
    pub fn data(&self) -> &[Expense] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of source rows that failed to parse and were excluded.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Appends an expense to the end of the sequence.
    pub fn push(&mut self, expense: Expense) {
        self.data.push(expense);
    }

    /// The full sheet contents for this data set: the header row followed by one row per expense.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.data.len() + 1);
        rows.push(EXPENSE_HEADERS.iter().map(|h| h.to_string()).collect());
        rows.extend(self.data.iter().map(Expense::to_row));
        rows
    }
}

impl<'a> IntoIterator for &'a Expenses {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// The column indices of the expected headers within one particular sheet.
struct Columns {
    member: usize,
    amount: usize,
    category: usize,
    payment_mode: usize,
    date: usize,
    deadline: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .with_context(|| format!("The sheet is missing the '{name}' column"))
        };
        Ok(Self {
            member: find(MEMBER_STR)?,
            amount: find(AMOUNT_STR)?,
            category: find(CATEGORY_STR)?,
            payment_mode: find(PAYMENT_MODE_STR)?,
            date: find(DATE_STR)?,
            deadline: find(DEADLINE_STR)?,
        })
    }

    /// Parses one data row, returning `None` if any required field is missing or invalid.
    /// A row shorter than the header is padded with empty cells.
    fn parse_row(&self, values: &[String]) -> Option<Expense> {
        let cell = |ix: usize| values.get(ix).map(String::as_str).unwrap_or("");
        let member = Member::from_str(cell(self.member).trim()).ok()?;
        let amount = Amount::from_str(cell(self.amount)).ok()?;
        let category = Category::new(cell(self.category)).ok()?;
        let payment_mode = PaymentMode::from_str(cell(self.payment_mode).trim()).ok()?;
        let date = date::parse_date(cell(self.date))?;
        let deadline = date::parse_date(cell(self.deadline));
        Some(Expense::new(
            member,
            amount,
            category,
            payment_mode,
            date,
            deadline,
        ))
    }
}

pub(crate) const MEMBER_STR: &str = "Member";
pub(crate) const AMOUNT_STR: &str = "Amount";
pub(crate) const CATEGORY_STR: &str = "Category";
pub(crate) const PAYMENT_MODE_STR: &str = "Payment_Mode";
pub(crate) const DATE_STR: &str = "Date";
pub(crate) const DEADLINE_STR: &str = "Deadline";

/// The expected columns, in the order they are written to the sheet.
pub(crate) const EXPENSE_HEADERS: [&str; 6] = [
    MEMBER_STR,
    AMOUNT_STR,
    CATEGORY_STR,
    PAYMENT_MODE_STR,
    DATE_STR,
    DEADLINE_STR,
];
