//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::{TestSheet, TestSheetState};
use crate::Config;
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

/// Test environment that sets up a budget home directory with a Config and an in-memory test
/// sheet. Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a Config backed by a unique test sheet.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("budget");
        let credentials_path = temp_dir.path().join("service_account.json");

        // Minimal service account key; Mode::Test never reads it.
        let credentials_content = r#"{
            "type": "service_account",
            "project_id": "test-project",
            "private_key_id": "test-key-id",
            "private_key": "",
            "client_email": "budget@test-project.iam.gserviceaccount.com",
            "token_uri": "https://oauth2.googleapis.com/token"
        }"#;
        std::fs::write(&credentials_path, credentials_content).unwrap();

        let sheet_url = format!(
            "https://docs.google.com/spreadsheets/d/{}/edit",
            unique_spreadsheet_id()
        );
        let config = Config::create(&root, &credentials_path, &sheet_url)
            .await
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Gets the current state of the TestSheet associated with this environment.
    pub fn get_state(&self) -> TestSheetState {
        let test_sheet = TestSheet::new(self.config.spreadsheet_id());
        test_sheet.get_state()
    }

    /// Sets the state of the TestSheet associated with this environment.
    pub fn set_state(&self, state: TestSheetState) {
        let test_sheet = TestSheet::new(self.config.spreadsheet_id());
        test_sheet.set_state(state)
    }

    /// Empties the TestSheet associated with this environment.
    pub fn clear_sheet(&self) {
        self.set_state(TestSheetState::default());
    }

    /// Replaces the TestSheet's rows.
    pub fn set_rows(&self, rows: Vec<Vec<&str>>) {
        let mut state = self.get_state();
        state.rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.set_state(state);
    }

    /// The TestSheet's current rows.
    pub fn sheet_rows(&self) -> Vec<Vec<String>> {
        self.get_state().rows
    }

    /// Makes the TestSheet accept or refuse writes.
    pub fn fail_writes(&self, fail: bool) {
        let mut state = self.get_state();
        state.fail_writes = fail;
        self.set_state(state);
    }
}

/// Each `TestEnv` gets its own spreadsheet ID so that tests running in parallel do not share
/// test sheet state.
fn unique_spreadsheet_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("TestSheet{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}
