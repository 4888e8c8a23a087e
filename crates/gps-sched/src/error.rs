use gps_core::{CoreError, DeviceId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("scheduler configuration error: {0}")]
    Config(String),

    #[error("device {0} is already attached")]
    AlreadyAttached(DeviceId),

    #[error("device {0} is not attached")]
    NotFound(DeviceId),

    #[error("generator is closed")]
    Closed,

    #[error("packet encoding failed: {0}")]
    Encode(#[from] CoreError),

    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type SchedResult<T> = Result<T, SchedError>;
