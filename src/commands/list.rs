//! List command handler: one month's expenses as a table.

use crate::commands::{Out, NO_EXPENSES_MESSAGE};
use crate::model::date::DISPLAY_DATE_FORMAT;
use crate::model::Expense;
use crate::report::{available_months, MonthKey};
use crate::{Config, ExpenseStore, Mode, Result};

const COLUMN_COUNT: usize = 6;
const TABLE_HEADERS: [&str; COLUMN_COUNT] = [
    "Date",
    "Member",
    "Category",
    "Amount",
    "Payment Mode",
    "Deadline",
];

/// Prints one month's expenses as a formatted table, in the order they were recorded.
///
/// When `month` is `None`, the most recent month with expenses is listed. A missing deadline is
/// shown as `N/A`.
pub async fn list(config: Config, mode: Mode, month: Option<MonthKey>) -> Result<Out<Vec<Expense>>> {
    let mut store = ExpenseStore::new(&config, mode).await?;
    let expenses = store.load().await;
    let months = available_months(expenses.data());
    let month = match month.or_else(|| months.first().copied()) {
        Some(month) => month,
        None => return Ok(Out::new_message(NO_EXPENSES_MESSAGE)),
    };

    let rows: Vec<Expense> = expenses
        .iter()
        .filter(|expense| MonthKey::from_date(expense.date()) == month)
        .cloned()
        .collect();
    if rows.is_empty() {
        return Ok(Out::new(format!("No expenses found for {month}"), rows));
    }

    let message = format!("Expenses for {month}\n{}", format_table(&rows));
    Ok(Out::new(message, rows))
}

fn format_table(expenses: &[Expense]) -> String {
    let rows: Vec<[String; COLUMN_COUNT]> = expenses.iter().map(table_row).collect();

    let mut widths: [usize; COLUMN_COUNT] = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (ix, cell) in row.iter().enumerate() {
            widths[ix] = widths[ix].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&TABLE_HEADERS.map(String::from), &widths));
    for row in &rows {
        lines.push(format_row(row, &widths));
    }
    lines.join("\n")
}

fn table_row(expense: &Expense) -> [String; COLUMN_COUNT] {
    [
        expense.date().format(DISPLAY_DATE_FORMAT).to_string(),
        expense.member().to_string(),
        expense.category().to_string(),
        expense.amount().to_string(),
        expense.payment_mode().to_string(),
        expense
            .deadline()
            .map(|deadline| deadline.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_else(|| String::from("N/A")),
    ]
}

fn format_row(cells: &[String; COLUMN_COUNT], widths: &[usize; COLUMN_COUNT]) -> String {
    let line = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<String>>()
        .join("  ");
    line.trim_end().to_string()
}
