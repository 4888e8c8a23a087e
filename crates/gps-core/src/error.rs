//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `gps-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid id {0:?}: expected 32 hex digits")]
    InvalidId(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Shorthand result type for `gps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
