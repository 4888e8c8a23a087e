//! Error types for gps-output.

use gps_core::CoreError;
use thiserror::Error;

/// Errors that can occur when recording telemetry.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("packet decode error: {0}")]
    Decode(#[from] CoreError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
