// Tab-separated import - pasted spreadsheet columns to records
use tracing::{debug, info};

use crate::error::{Result, TallyError};
use crate::models::ActivityRecord;

/// Built-in sample: one line per record, category and action split by a tab
pub const SAMPLE_DATA: &str = "ACCOUNT\tEMAIL
OB\tPROCESS
OB\tPROCESS
OB\tPROCESS
TEAM'S DEV\tMEETING
ACCOUNT\tENDO
OB\tPROCESS
ACCOUNT\tEMAIL
ACCOUNT\tSMS
ACCOUNT\tEMAIL";

/// Turn each non-blank line into a record.
///
/// The first column is the category and the second the action, both trimmed;
/// a missing column becomes an empty string and extra columns are dropped.
/// A leading byte order mark (spreadsheet exports) is ignored.
pub fn parse_tab_separated(text: &str) -> Vec<ActivityRecord> {
    text.trim_start_matches('\u{feff}')
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.split('\t');
            let category = parts.next().unwrap_or("").trim();
            let action = parts.next().unwrap_or("").trim();
            ActivityRecord::new(category, action)
        })
        .collect()
}

/// Parse pasted text, rejecting input that yields nothing
pub fn import(text: &str) -> Result<Vec<ActivityRecord>> {
    if text.trim().is_empty() {
        return Err(TallyError::EmptyInput);
    }

    let records = parse_tab_separated(text);
    if records.is_empty() {
        return Err(TallyError::NoRecords);
    }

    debug!("Parsed {} lines", records.len());
    info!("Imported {} records", records.len());
    Ok(records)
}
