//! Error types for the spiral simulation

use parker_log::LogError;
use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while configuring or advancing the spiral
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Log error: {0}")]
    Log(#[from] LogError),

    #[error("Ephemeris error: {0}")]
    Ephemeris(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
