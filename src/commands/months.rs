//! Months command handler: the months available for reporting.

use crate::commands::{Out, NO_EXPENSES_MESSAGE};
use crate::report::{available_months, MonthKey};
use crate::{Config, ExpenseStore, Mode, Result};

/// Prints the distinct months that have expenses, most recent first.
pub async fn months(config: Config, mode: Mode) -> Result<Out<Vec<MonthKey>>> {
    let mut store = ExpenseStore::new(&config, mode).await?;
    let expenses = store.load().await;
    let months = available_months(expenses.data());
    if months.is_empty() {
        return Ok(Out::new(NO_EXPENSES_MESSAGE.to_string(), months));
    }
    let message = months
        .iter()
        .map(MonthKey::to_string)
        .collect::<Vec<String>>()
        .join("\n");
    Ok(Out::new(message, months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_months_most_recent_first() {
        let env = TestEnv::new().await;
        env.set_rows(vec![
            vec!["Member", "Amount", "Category", "Payment_Mode", "Date", "Deadline"],
            vec!["Mother", "100.00", "Grocery", "Cash", "2024-01-05", ""],
            vec!["Husnain", "15.00", "Snacks", "Cash", "2024-02-01", ""],
            vec!["Father", "40.00", "Fuel", "Online", "2023-12-09", ""],
        ]);

        let out = months(env.config(), Mode::Test).await.unwrap();
        let keys: Vec<String> = out
            .structure()
            .unwrap()
            .iter()
            .map(MonthKey::to_string)
            .collect();
        assert_eq!(keys, vec!["2024-02", "2024-01", "2023-12"]);
        assert_eq!(out.message(), "2024-02\n2024-01\n2023-12");
    }

    #[tokio::test]
    async fn test_months_empty_store() {
        let env = TestEnv::new().await;
        env.clear_sheet();

        let out = months(env.config(), Mode::Test).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert!(out.message().contains("No expenses found"));
    }
}
