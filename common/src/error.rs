//! Error types

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown field name or enum value in an edit command
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Persisted draft exists but is not a usable snapshot
    #[error("Malformed snapshot: {0}")]
    Snapshot(String),

    /// Workbook could not be assembled
    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
