//! Configuration file handling for the budget CLI.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and contains settings for the
//! budget application including the Google Sheet URL, the worksheet that holds the expense rows,
//! and the location of the service account credentials.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const SERVICE_ACCOUNT_JSON: &str = "service_account.json";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_WORKSHEET: &str = "Sheet1";
const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the budget home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the data directory, its subdirectories and:
    /// - Creates an initial `config.json` file using `sheet_url` along with default settings
    /// - Moves `credentials_file` into its default location in the data dir.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/budget`
    /// - `credentials_file` - The downloaded Google service account key needed to access the
    ///   spreadsheet. This will be moved from the `credentials_file` path to its default location
    ///   and name in the data directory.
    /// - `sheet_url` - The URL of the Google Sheet where the expense data is stored.
    ///   e.g. https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        credentials_file: &Path,
        sheet_url: &str,
    ) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;

        // Create the secrets subdirectory
        let secrets_dir = root.join(SECRETS);
        utils::make_dir(&secrets_dir).await?;

        // Move the service account key to its default location in the data dir
        let credentials_destination = secrets_dir.join(SERVICE_ACCOUNT_JSON);
        utils::rename(credentials_file, credentials_destination).await?;
        let config_path = root.join(CONFIG_JSON);

        // Create and save an initial ConfigFile in the datastore
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: sheet_url.to_string(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            credentials_path: None,
        };
        config_file.save(&config_path).await?;

        // Extract the spreadsheet ID from the URL
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?;

        // Return a new `Config` object that represents a data directory that is ready to use
        Ok(Self {
            root,
            secrets: secrets_dir,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    /// This will
    /// - validate that the `budget_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the secrets directory exists
    /// - return the loaded configuration object
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative).await?;

        // Validate that the home directory exists.
        let _ = utils::read_dir(&root)
            .await
            .context("Budget home is missing, run 'budget init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        // Extract the spreadsheet ID from the URL
        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?;

        let config = Self {
            root: root.clone(),
            secrets: root.join(SECRETS),
            config_path,
            config_file,
            spreadsheet_id,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// The name of the worksheet (tab) that holds the expense rows.
    pub fn worksheet(&self) -> &str {
        &self.config_file.worksheet
    }

    /// How long loaded expense data may be served from the in-memory cache.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config_file.cache_ttl_seconds)
    }

    /// Returns the stored `credentials_path` if it is absolute, otherwise resolves the relative
    /// path against the budget home directory.
    pub fn credentials_path(&self) -> PathBuf {
        let p = self.config_file.credentials_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "worksheet": "Sheet1",
///   "cache_ttl_seconds": 60,
///   "credentials_path": ".secrets/service_account.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL to the Google Sheet holding the expense data
    sheet_url: String,

    /// The worksheet (tab) that holds the expense rows. The first tab of a new spreadsheet.
    #[serde(default = "default_worksheet")]
    worksheet: String,

    /// How many seconds loaded expense data may be served from the in-memory cache
    #[serde(default = "default_cache_ttl_seconds")]
    cache_ttl_seconds: u64,

    /// Path to the service account key file (optional, relative to config.json or absolute)
    /// Defaults to $BUDGET_HOME/.secrets/service_account.json if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials_path: Option<PathBuf>,
}

fn default_worksheet() -> String {
    DEFAULT_WORKSHEET.to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            worksheet: default_worksheet(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            credentials_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the credentials path.
    ///
    /// If the path is relative, it should be interpreted as relative to the budget home.
    /// If None, defaults to $BUDGET_HOME/.secrets/service_account.json
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(SERVICE_ACCOUNT_JSON))
    }

    #[cfg(test)]
    /// Creates a new ConfigFile with the specified settings.
    pub fn new(
        sheet_url: String,
        worksheet: String,
        cache_ttl_seconds: u64,
        credentials_path: Option<PathBuf>,
    ) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url,
            worksheet,
            cache_ttl_seconds,
            credentials_path,
        }
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL.
///
/// # Arguments
/// * `url` - The Google Sheets URL (e.g., "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...")
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid. Returns an empty string if the URL
/// is empty.
fn extract_spreadsheet_id(url: &str) -> Result<String> {
    // Handle empty URL case
    if url.is_empty() {
        return Ok(String::new());
    }

    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parsed = Url::parse(url).with_context(|| format!("Unable to parse sheet URL '{url}'"))?;
    let mut segments = parsed
        .path_segments()
        .with_context(|| format!("The sheet URL '{url}' has no path"))?;
    while let Some(segment) = segments.next() {
        if segment == "d" {
            match segments.next() {
                Some(id) if !id.is_empty() => return Ok(id.to_string()),
                _ => break,
            }
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("budget_home");
        let credentials_source_file = dir.path().join("key.json");
        let credentials_content = "{\"type\": \"service_account\"}";
        let sheet_url = "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit";
        utils::write(&credentials_source_file, credentials_content)
            .await
            .unwrap();

        // Run the function under test:
        let config = Config::create(&home_dir, &credentials_source_file, sheet_url)
            .await
            .unwrap();

        // Check some values on the config object
        assert_eq!(sheet_url, config.sheet_url());
        assert_eq!(
            "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
            config.spreadsheet_id()
        );
        assert_eq!("Sheet1", config.worksheet());
        assert_eq!(Duration::from_secs(60), config.cache_ttl());

        // Check for some files in the directory
        let found_credentials = utils::read(&config.credentials_path()).await.unwrap();
        assert_eq!(credentials_content, found_credentials);
        assert!(config.secrets().is_dir());
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("budget_home");
        let credentials_file = dir.path().join("key.json");
        utils::write(&credentials_file, "{}").await.unwrap();
        let url = "https://example.com/spreadsheets/d/MySheetIDX";
        let created = Config::create(&home_dir, &credentials_file, url).await.unwrap();

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(created.spreadsheet_id(), loaded.spreadsheet_id());
        assert_eq!("MySheetIDX", loaded.spreadsheet_id());
        assert_eq!(url, loaded.sheet_url());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.sheet_url, "");
        assert_eq!(config.worksheet, "Sheet1");
        assert_eq!(config.cache_ttl_seconds, 60);
        assert_eq!(
            config.credentials_path(),
            PathBuf::from(SECRETS).join(SERVICE_ACCOUNT_JSON)
        );
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = ConfigFile::new(
            "https://docs.google.com/spreadsheets/d/test123".to_string(),
            "Expenses".to_string(),
            30,
            Some(PathBuf::from(".secrets/my_key.json")),
        );

        // Save the config
        original_config.save(&config_path).await.unwrap();

        // Load it back
        let loaded_config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let json = r#"{
            "app_name": "budget",
            "config_version": 1,
            "sheet_url": "https://docs.google.com/spreadsheets/d/minimal"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(
            config.sheet_url,
            "https://docs.google.com/spreadsheets/d/minimal"
        );
        assert_eq!(config.worksheet, "Sheet1");
        assert_eq!(config.cache_ttl_seconds, 60);
        assert_eq!(
            config.credentials_path(),
            PathBuf::from(SECRETS).join(SERVICE_ACCOUNT_JSON)
        );
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "sheet_url": "https://docs.google.com/spreadsheets/d/test"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("credentials_path"));
    }

    #[test]
    fn test_extract_spreadsheet_id() {
        let url = "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit";
        let id = extract_spreadsheet_id(url).unwrap();
        assert_eq!(id, "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL");

        let url2 = "https://docs.google.com/spreadsheets/d/ABC123";
        let id2 = extract_spreadsheet_id(url2).unwrap();
        assert_eq!(id2, "ABC123");

        let invalid = "https://example.com/invalid";
        assert!(extract_spreadsheet_id(invalid).is_err());

        // Empty URL should return empty string
        let empty = "";
        let id_empty = extract_spreadsheet_id(empty).unwrap();
        assert_eq!(id_empty, "");
    }

    #[test]
    fn test_extract_spreadsheet_id_with_query() {
        let url = "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL?foo=bar";
        let id = extract_spreadsheet_id(url).unwrap();
        assert_eq!(id, "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL");
    }
}
