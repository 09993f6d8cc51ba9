//! Lenient date parsing and the fixed formats used for the sheet and for display.

use chrono::NaiveDate;

/// The fixed format dates are written to the sheet with, e.g. `2024-02-01`.
pub const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";

/// The format dates are displayed with in tables, e.g. `01-02-2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// The formats accepted when reading dates back from the sheet. The sheet format comes first;
/// the others tolerate cells that were typed by hand or reformatted by the spreadsheet UI.
const ACCEPTED_DATE_FORMATS: &[&str] = &[SHEET_DATE_FORMAT, "%m/%d/%Y", DISPLAY_DATE_FORMAT];

/// Parses a date cell leniently. Returns `None` for an empty cell or for text that matches none
/// of the accepted formats; parse failure is "missing", never an error.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// The string written to the sheet for an optional date: the fixed format, or empty for `None`.
pub fn to_sheet_value(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(SHEET_DATE_FORMAT).to_string(),
        None => String::new(),
    }
}
