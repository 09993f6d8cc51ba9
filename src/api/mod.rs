//! Access to the remote spreadsheet that holds the expense data.

mod auth;
mod sheet;
mod test_sheet;

use crate::{Config, Result};

// OAuth scope required for Sheets API read/write access.
const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

pub(crate) use auth::TokenProvider;
pub(crate) use test_sheet::TestSheet;
#[cfg(test)]
pub(crate) use test_sheet::TestSheetState;

/// The operations the app needs from the remote tabular store. The worksheet is treated as one
/// flat block of rows; there is no incremental update, only read-all, clear and write-all.
#[async_trait::async_trait]
pub(crate) trait SheetStore: Send {
    /// Reads every row of the worksheet.
    async fn read_all(&mut self) -> Result<Vec<Vec<String>>>;

    /// Clears the entire worksheet.
    async fn clear(&mut self) -> Result<()>;

    /// Writes `rows` to the worksheet starting at the first cell.
    async fn write_all(&mut self, rows: &[Vec<String>]) -> Result<()>;
}

/// Selects which `SheetStore` implementation to use.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Mode {
    /// Use the Google Sheets API.
    #[default]
    Google,
    /// Use the in-memory test sheet; no network access.
    Test,
}

impl Mode {
    /// When BUDGET_IN_TEST_MODE is set and non-zero in length, the mode will be `Mode::Test`,
    /// otherwise it will be `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var("BUDGET_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Creates the `SheetStore` for `mode`. For `Mode::Google` this loads the service account
/// credentials, which is where a missing credentials file halts the command.
pub(crate) async fn sheet_store(config: &Config, mode: Mode) -> Result<Box<dyn SheetStore>> {
    match mode {
        Mode::Google => {
            let token_provider = TokenProvider::load(&config.credentials_path()).await?;
            let sheet = sheet::GoogleSheet::new(config.clone(), token_provider).await?;
            Ok(Box::new(sheet))
        }
        Mode::Test => Ok(Box::new(TestSheet::new(config.spreadsheet_id()))),
    }
}
