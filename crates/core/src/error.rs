//! Error types for the equity returns pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the equity returns pipeline.
///
/// Unparseable numeric fields are not errors; they surface as `None` values.
#[derive(Error, Debug)]
pub enum Error {
    /// A record's date could not be resolved to a calendar date.
    #[error("Invalid date at record {index}: {value:?} ({reason})")]
    InvalidDate {
        /// Position of the record in the caller's input.
        index: usize,
        /// Raw date text as supplied.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// No records to build a series from.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid date error.
    pub fn invalid_date(index: usize, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidDate {
            index,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty input error.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Error::EmptyInput(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
