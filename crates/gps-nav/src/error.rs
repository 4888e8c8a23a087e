use gps_core::{CoreError, RouteId};
use gps_curve::CurveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("route {0} has no tracks")]
    EmptyRoute(RouteId),

    #[error("invalid offline range [{min}, {max}]: need 1 <= min <= max <= {limit}", limit = crate::NavigatorConfig::MAX_OFFLINE_TICKS)]
    OfflineRange { min: u32, max: u32 },

    #[error("invalid elevation: {0}")]
    Elevation(#[from] CurveError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type NavResult<T> = Result<T, NavError>;
