//! Report command handler: the month dashboard.

use crate::commands::{Out, NO_EXPENSES_MESSAGE};
use crate::model::Amount;
use crate::report::{available_months, summarize, MonthKey, MonthSummary};
use crate::{Config, ExpenseStore, Mode, Result};

/// Produces the dashboard for one month: total spend, average transaction, and the per-category
/// and per-member breakdowns, largest first.
///
/// When `month` is `None`, the most recent month with expenses is reported. When there are no
/// expenses at all, a "no expenses" message is returned instead of a summary.
pub async fn report(
    config: Config,
    mode: Mode,
    month: Option<MonthKey>,
) -> Result<Out<MonthSummary>> {
    let mut store = ExpenseStore::new(&config, mode).await?;
    let expenses = store.load().await;
    let months = available_months(expenses.data());
    let month = match month.or_else(|| months.first().copied()) {
        Some(month) => month,
        None => return Ok(Out::new_message(NO_EXPENSES_MESSAGE)),
    };
    let summary = summarize(expenses.data(), month);
    let message = format_dashboard(&summary);
    Ok(Out::new(message, summary))
}

fn format_dashboard(summary: &MonthSummary) -> String {
    if summary.count == 0 {
        return format!("No expenses found for {}", summary.month);
    }
    let mut lines = vec![
        format!("Dashboard for {}", summary.month),
        format!("Total Spent: {}", Amount::new(summary.total)),
    ];
    if let Some(mean) = summary.mean {
        lines.push(format!("Average Transaction: {}", Amount::new(mean.round_dp(2))));
    }

    lines.push(String::new());
    lines.push(String::from("Spending by Category"));
    let width = name_width(summary.by_category.iter().map(|entry| entry.category.to_string()));
    for entry in &summary.by_category {
        lines.push(format!(
            "  {:<width$}  {}",
            entry.category,
            Amount::new(entry.total),
        ));
    }

    lines.push(String::new());
    lines.push(String::from("Spending by Member"));
    let width = name_width(summary.by_member.iter().map(|entry| entry.member.to_string()));
    for entry in &summary.by_member {
        lines.push(format!(
            "  {:<width$}  {}",
            entry.member,
            Amount::new(entry.total),
        ));
    }

    lines.join("\n")
}

fn name_width(names: impl Iterator<Item = String>) -> usize {
    names.map(|name| name.chars().count()).max().unwrap_or(0)
}
