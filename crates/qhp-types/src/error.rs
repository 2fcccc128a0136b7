//! Error types for qhp.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for qhp operations.
pub type Result<T> = std::result::Result<T, QhpError>;

/// Errors that can occur while retrieving and assembling bar series.
#[derive(Error, Debug)]
pub enum QhpError {
    /// Wire payload could not be decoded into bar records.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Contract identifier does not match the expected pattern.
    #[error("Invalid ticker format: {0}")]
    InvalidTickerFormat(String),

    /// No reply within the channel deadline.
    #[error("Request timed out")]
    Timeout,

    /// The far end reported a failure.
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Transport-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A setting or pattern supplied by the caller is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date string could not be parsed.
    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),
}
