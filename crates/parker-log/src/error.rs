//! Error types for the spiral log codec

use thiserror::Error;

/// Result type for log operations
pub type LogResult<T> = Result<T, LogError>;

/// Malformed date or time text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date '{input}': {reason}")]
pub struct FormatError {
    pub input: String,
    pub reason: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { input: input.into(), reason: reason.into() }
    }
}

/// Errors that can occur while writing or reading a spiral log
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Format error on line {line}: {source}")]
    FormatAt {
        line: usize,
        #[source]
        source: FormatError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
