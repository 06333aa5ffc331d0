//! Widget error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("No column with key '{0}'")]
    UnknownColumn(String),

    #[error("No row with id {0} in the table data")]
    UnknownRow(String),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord {
        index: usize,
        reason: String,
    },

    #[error("Failed to parse table data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
