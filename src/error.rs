//! Error type for loading assumptions and writing results

use thiserror::Error;

/// Errors surfaced to callers of the underwriting model
///
/// Only structurally invalid input is fatal. Missing optional fields resolve to
/// defaults at load time and never produce one of these.
#[derive(Debug, Error)]
pub enum UnderwritingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed assumptions JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Hold period must be a positive number of months (got {0})")]
    InvalidHoldPeriod(i64),

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, UnderwritingError>;
