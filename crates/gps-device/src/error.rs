use gps_core::CoreError;
use gps_curve::CurveError;
use gps_nav::NavError;
use thiserror::Error;

use crate::device::{
    MAX_DESCRIPTION_LEN, MAX_MODEL_LEN, MAX_SENSOR_NAME_LEN, MAX_SENSORS, MAX_USER_ID_LEN,
};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("model must be 1..={max} characters, got {0}", max = MAX_MODEL_LEN)]
    Model(usize),

    #[error("description must be at most {max} characters, got {0}", max = MAX_DESCRIPTION_LEN)]
    Description(usize),

    #[error("user id must be at most {max} characters, got {0}", max = MAX_USER_ID_LEN)]
    UserId(usize),

    #[error("at most {max} sensors are allowed, got {0}", max = MAX_SENSORS)]
    TooManySensors(usize),

    #[error("sensor name {0:?} must be 1..={max} characters", max = MAX_SENSOR_NAME_LEN)]
    SensorName(String),

    #[error("a device needs at least one route")]
    NoRoutes,

    #[error("invalid {what} curve: {source}")]
    Curve {
        what:   &'static str,
        #[source]
        source: CurveError,
    },

    #[error(transparent)]
    Nav(#[from] NavError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;

impl DeviceError {
    pub(crate) fn curve(what: &'static str) -> impl FnOnce(CurveError) -> DeviceError {
        move |source| DeviceError::Curve { what, source }
    }
}
