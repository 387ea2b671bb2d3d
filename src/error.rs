use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Please enter some data to import")]
    EmptyInput,
    #[error("No valid records found in the input")]
    NoRecords,
    #[error("No data to clear")]
    NothingToClear,
    #[error("No data to download")]
    NothingToExport,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to generate chart: {0}")]
    Chart(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TallyError>;
