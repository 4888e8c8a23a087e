//! Path-model error type.

use thiserror::Error;

use gps_core::CoreError;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid path: need at least 2 points, got {0}")]
    InvalidPath(usize),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type PathResult<T> = Result<T, PathError>;
