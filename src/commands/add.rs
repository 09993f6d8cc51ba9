//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{Category, Expense};
use crate::{Config, ExpenseStore, Mode, Result};
use anyhow::Context;
use chrono::Local;

/// Records one expense and saves the entire data set back to the sheet.
///
/// The date defaults to today when not provided. The category is normalized (trimmed and
/// title-cased) before the expense is constructed. A missing category or a non-positive amount
/// rejects the submission and leaves the sheet unchanged.
///
/// # Returns
///
/// On success, returns an `Out` containing:
/// - A message indicating the expense was saved.
/// - The expense as it was recorded.
///
/// # Errors
///
/// - Returns an error if validation fails.
/// - Returns an error if the sheet cannot be written. The failed save is surfaced to the user;
///   nothing is retried automatically.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Expense>> {
    let category =
        Category::new(args.category()).context("Please fill in the category")?;
    let date = args.date().unwrap_or_else(|| Local::now().date_naive());
    let expense = Expense::new(
        args.member(),
        args.amount(),
        category,
        args.payment_mode(),
        date,
        args.deadline(),
    );

    let mut store = ExpenseStore::new(&config, mode).await?;
    store.append(expense.clone()).await?;

    let message = format!(
        "Added {} for {} ({}) on {}",
        expense.amount(),
        expense.category(),
        expense.member(),
        expense.date().format(crate::model::date::SHEET_DATE_FORMAT),
    );
    Ok(Out::new(message, expense))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::AddArgs;
    use crate::model::{Amount, Member, PaymentMode};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_add_success_normalizes_category() {
        let env = TestEnv::new().await;
        env.clear_sheet();

        let args = AddArgs::new(
            Member::Father,
            " grocery ",
            Amount::new(dec!(10.00)),
            PaymentMode::Online,
            Some(ymd(2024, 2, 1)),
            None,
        );

        let out = add(env.config(), Mode::Test, args).await.unwrap();
        let expense = out.structure().unwrap();
        assert_eq!(expense.category().as_ref(), "Grocery");

        let rows = env.sheet_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            vec!["Father", "10.00", "Grocery", "Online", "2024-02-01", ""]
        );
    }

    #[tokio::test]
    async fn test_add_appends_after_existing_rows() {
        let env = TestEnv::new().await;
        env.clear_sheet();

        let first = AddArgs::new(
            Member::Mother,
            "Fuel",
            Amount::new(dec!(12.50)),
            PaymentMode::Cash,
            Some(ymd(2024, 1, 1)),
            None,
        );
        let second = AddArgs::new(
            Member::Father,
            "Grocery",
            Amount::new(dec!(99.00)),
            PaymentMode::Online,
            Some(ymd(2024, 1, 2)),
            Some(ymd(2024, 1, 20)),
        );

        add(env.config(), Mode::Test, first).await.unwrap();
        add(env.config(), Mode::Test, second).await.unwrap();

        let rows = env.sheet_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][2], "Fuel");
        assert_eq!(rows[2][2], "Grocery");
        assert_eq!(rows[2][5], "2024-01-20");
    }

    #[tokio::test]
    async fn test_add_defaults_date_to_today() {
        let env = TestEnv::new().await;
        env.clear_sheet();

        let args = AddArgs::new(
            Member::Brother,
            "Snacks",
            Amount::new(dec!(5.00)),
            PaymentMode::Cash,
            None,
            None,
        );

        let out = add(env.config(), Mode::Test, args).await.unwrap();
        let expense = out.structure().unwrap();
        assert_eq!(expense.date(), Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_add_rejects_empty_category() {
        let env = TestEnv::new().await;
        env.clear_sheet();

        let args = AddArgs::new(
            Member::Father,
            "   ",
            Amount::new(dec!(10.00)),
            PaymentMode::Online,
            Some(ymd(2024, 2, 1)),
            None,
        );

        let result = add(env.config(), Mode::Test, args).await;
        assert!(result.is_err());

        // No state change
        assert!(env.sheet_rows().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_zero_amount() {
        let env = TestEnv::new().await;
        env.clear_sheet();

        let args = AddArgs::new(
            Member::Father,
            "Grocery",
            Amount::new(dec!(0)),
            PaymentMode::Online,
            Some(ymd(2024, 2, 1)),
            None,
        );

        let result = add(env.config(), Mode::Test, args).await;
        assert!(result.is_err());
        assert!(env.sheet_rows().is_empty());
    }

    #[tokio::test]
    async fn test_add_surfaces_save_failure() {
        let env = TestEnv::new().await;
        env.clear_sheet();
        env.fail_writes(true);

        let args = AddArgs::new(
            Member::Father,
            "Grocery",
            Amount::new(dec!(10.00)),
            PaymentMode::Online,
            Some(ymd(2024, 2, 1)),
            None,
        );

        let result = add(env.config(), Mode::Test, args).await;
        assert!(result.is_err());
        assert!(env.sheet_rows().is_empty());
    }
}
