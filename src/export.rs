// CSV export of the raw record list
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, TallyError};
use crate::models::ActivityRecord;

pub const CSV_HEADER: &str = "Category,Action";
pub const DEFAULT_CSV_FILE: &str = "activity_data.csv";

/// Render records as `Category,Action` lines using the values as entered
pub fn to_csv(records: &[ActivityRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(TallyError::NothingToExport);
    }

    let rows = records
        .iter()
        .map(|r| format!("{},{}", r.category, r.action))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!("{}\n{}", CSV_HEADER, rows))
}

pub fn write_csv(records: &[ActivityRecord], path: &Path) -> Result<()> {
    let csv = to_csv(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, csv)?;

    info!("CSV file written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_export_fails() {
        assert!(matches!(to_csv(&[]), Err(TallyError::NothingToExport)));
    }

    #[test]
    fn test_csv_uses_raw_values() {
        let records = vec![
            ActivityRecord::untimed("OB", "PROCESS"),
            ActivityRecord::untimed("", ""),
            ActivityRecord::untimed("TEAM'S DEV", "CALL LISTENING"),
        ];
        assert_eq!(
            to_csv(&records).unwrap(),
            "Category,Action\nOB,PROCESS\n,\nTEAM'S DEV,CALL LISTENING"
        );
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join(DEFAULT_CSV_FILE);
        write_csv(&[ActivityRecord::untimed("IB", "WC")], &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Category,Action\nIB,WC");
    }
}
