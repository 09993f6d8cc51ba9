//! Implements the very simple `SheetStore` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole app, top-to-bottom, without using Google Sheets.

use crate::api::SheetStore;
use crate::Result;
use anyhow::bail;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, OnceLock};

/// The contents of one in-memory sheet, keyed by spreadsheet ID in a process-wide map so that
/// separate `TestSheet` instances for the same spreadsheet see the same data, the way separate
/// clients of a real sheet would.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestSheetState {
    /// The rows of the sheet.
    pub(crate) rows: Vec<Vec<String>>,
    /// When true, `clear` and `write_all` fail. Lets tests exercise the flush-failure path.
    pub(crate) fail_writes: bool,
}

fn state_map() -> &'static Mutex<HashMap<String, TestSheetState>> {
    static STATE: OnceLock<Mutex<HashMap<String, TestSheetState>>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// An implementation of the `SheetStore` trait that does not use Google sheets. New spreadsheet
/// IDs are seeded with some existing data.
pub(crate) struct TestSheet {
    spreadsheet_id: String,
}

impl TestSheet {
    /// Creates a `TestSheet` for `spreadsheet_id`, seeding it on first use.
    pub(crate) fn new(spreadsheet_id: impl Into<String>) -> Self {
        let spreadsheet_id = spreadsheet_id.into();
        let mut map = state_map().lock().unwrap();
        map.entry(spreadsheet_id.clone()).or_insert_with(|| TestSheetState {
            rows: load_csv(SEED_DATA).unwrap(),
            fail_writes: false,
        });
        Self { spreadsheet_id }
    }

    /// Gets the current state of this sheet.
    #[cfg(test)]
    pub(crate) fn get_state(&self) -> TestSheetState {
        state_map()
            .lock()
            .unwrap()
            .get(&self.spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Sets the state of this sheet.
    #[cfg(test)]
    pub(crate) fn set_state(&self, state: TestSheetState) {
        state_map()
            .lock()
            .unwrap()
            .insert(self.spreadsheet_id.clone(), state);
    }
}

#[async_trait::async_trait]
impl SheetStore for TestSheet {
    async fn read_all(&mut self) -> Result<Vec<Vec<String>>> {
        let map = state_map().lock().unwrap();
        Ok(map
            .get(&self.spreadsheet_id)
            .map(|state| state.rows.clone())
            .unwrap_or_default())
    }

    async fn clear(&mut self) -> Result<()> {
        let mut map = state_map().lock().unwrap();
        let state = map.entry(self.spreadsheet_id.clone()).or_default();
        if state.fail_writes {
            bail!("Test sheet '{}' is refusing writes", self.spreadsheet_id);
        }
        state.rows.clear();
        Ok(())
    }

    async fn write_all(&mut self, rows: &[Vec<String>]) -> Result<()> {
        let mut map = state_map().lock().unwrap();
        let state = map.entry(self.spreadsheet_id.clone()).or_default();
        if state.fail_writes {
            bail!("Test sheet '{}' is refusing writes", self.spreadsheet_id);
        }
        state.rows = rows.to_vec();
        Ok(())
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let bytes = csv_data.as_bytes();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .from_reader(Cursor::new(bytes));

    let mut rows: Vec<Vec<String>> = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Seed expense data.
const SEED_DATA: &str = r##"Member,Amount,Category,Payment_Mode,Date,Deadline
Mother,1250.00,Grocery,Cash,2025-09-02,
Husnain,540.50,Fuel,Credit Card,2025-09-05,
Father,3200.00,School Fees,Online,2025-09-08,2025-09-30
Brother,220.00,Snacks,Cash,2025-09-13,
Mother,980.75,Grocery,Online,2025-09-21,
Father,1500.00,Electricity,Online,2025-10-01,2025-10-15
Husnain,610.00,Fuel,Credit Card,2025-10-04,
Mother,1410.25,Grocery,Cash,2025-10-09,
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_then_cleared() {
        let mut sheet = TestSheet::new("test-sheet-seeded-then-cleared");
        let rows = sheet.read_all().await.unwrap();
        assert!(!rows.is_empty());
        assert_eq!(rows[0][0], "Member");

        sheet.clear().await.unwrap();
        let rows = sheet.read_all().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_write_all_replaces_contents() {
        let mut sheet = TestSheet::new("test-sheet-write-all");
        let new_rows = vec![vec!["Member".to_string()], vec!["Mother".to_string()]];
        sheet.write_all(&new_rows).await.unwrap();
        assert_eq!(sheet.read_all().await.unwrap(), new_rows);
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let sheet = TestSheet::new("test-sheet-fail-writes");
        let mut state = sheet.get_state();
        state.fail_writes = true;
        sheet.set_state(state);

        let mut sheet = TestSheet::new("test-sheet-fail-writes");
        assert!(sheet.clear().await.is_err());
        assert!(sheet.write_all(&[]).await.is_err());
        // Reads still work
        assert!(sheet.read_all().await.is_ok());
    }

    #[test]
    fn test_load_csv() {
        let rows = load_csv("a,b\nc,d\n").unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }
}
