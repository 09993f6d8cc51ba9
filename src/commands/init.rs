//! Init command handler.

use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories and:
/// - Creates an initial `config.json` file using `sheet_url` along with default settings
/// - Moves `credentials_file` into its default location in the data dir.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/budget`
/// - `credentials_file` - The downloaded Google service account key. This will be moved from the
///   `credentials_file` path to its default location and name in the data directory.
/// - `sheet_url` - The URL of the Google Sheet where the expense data is stored.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(budget_home: &Path, credentials_file: &Path, sheet_url: &str) -> Result<Out<()>> {
    let config = Config::create(budget_home, credentials_file, sheet_url)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the budget directory and config at '{}'",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget");
        let credentials = dir.path().join("key.json");
        utils::write(&credentials, "{}").await.unwrap();

        let out = init(
            &home,
            &credentials,
            "https://docs.google.com/spreadsheets/d/InitTest123/edit",
        )
        .await
        .unwrap();

        assert!(out.message().contains("Successfully created"));
        let config = Config::load(&home).await.unwrap();
        assert_eq!("InitTest123", config.spreadsheet_id());
    }
}
