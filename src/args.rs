//! These structs provide the CLI interface for the budget CLI.

use crate::model::{Amount, Member, PaymentMode};
use crate::report::MonthKey;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: A command-line tracker for household expenses.
///
/// The purpose of this program is to record your family's expenses in a Google Sheet and to
/// summarize them month-by-month: total and average spend, and breakdowns by category and by
/// family member.
///
/// You will need a Google Cloud service account with access to the spreadsheet. See the README
/// at https://github.com/webern/family-budget for documentation on how to set this up.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration files.
    ///
    /// This is the first command you should run when setting up the budget CLI. You need to get
    /// a few things ready beforehand.
    ///
    /// - Decide what directory you want to store configuration in and pass this as
    ///   --budget-home. By default, it will be $HOME/budget.
    ///
    /// - Get the URL of the Google Sheet that holds (or will hold) your expense data and pass
    ///   it as --sheet-url. The sheet must be shared with your service account.
    ///
    /// - Download your Google Cloud service account key to a file and pass it as --credentials.
    ///   The file will be moved into the data directory.
    Init(InitArgs),
    /// Record one expense and save it to the sheet.
    Add(AddArgs),
    /// Show the dashboard for one month: total, average, and breakdowns.
    Report(ReportArgs),
    /// Print one month's expenses as a table.
    List(ListArgs),
    /// Print the months that have expenses, most recent first.
    Months(MonthsArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budget configuration is held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to your Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your downloaded service account key. This file will be moved to the default
    /// secrets location in the main data directory.
    #[arg(long)]
    credentials: PathBuf,
}

impl InitArgs {
    pub fn new(sheet_url: impl Into<String>, credentials: impl Into<PathBuf>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            credentials: credentials.into(),
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn credentials(&self) -> &Path {
        &self.credentials
    }
}

/// Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The family member who spent the money.
    #[arg(long)]
    member: Member,

    /// What the money was spent on, e.g. Grocery, Fuel.
    #[arg(long)]
    category: String,

    /// The amount spent. Must be at least 0.01.
    #[arg(long)]
    amount: Amount,

    /// How the expense was paid.
    #[arg(long)]
    payment_mode: PaymentMode,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// An optional payment deadline as YYYY-MM-DD.
    #[arg(long)]
    deadline: Option<NaiveDate>,
}

impl AddArgs {
    pub fn new(
        member: Member,
        category: impl Into<String>,
        amount: Amount,
        payment_mode: PaymentMode,
        date: Option<NaiveDate>,
        deadline: Option<NaiveDate>,
    ) -> Self {
        Self {
            member,
            category: category.into(),
            amount,
            payment_mode,
            date,
            deadline,
        }
    }

    pub fn member(&self) -> Member {
        self.member
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }
}

/// Args for the `budget report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The month to report on, as YYYY-MM. Defaults to the most recent month with expenses.
    #[arg(long)]
    month: Option<MonthKey>,
}

impl ReportArgs {
    pub fn new(month: Option<MonthKey>) -> Self {
        Self { month }
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }
}

/// Args for the `budget list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// The month to list, as YYYY-MM. Defaults to the most recent month with expenses.
    #[arg(long)]
    month: Option<MonthKey>,
}

impl ListArgs {
    pub fn new(month: Option<MonthKey>) -> Self {
        Self { month }
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }
}

/// Args for the `budget months` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthsArgs {}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
