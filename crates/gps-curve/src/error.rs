use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("amplitude {0} outside [{min}, {max}]", min = crate::Curve::MIN_AMPLITUDE, max = crate::Curve::MAX_AMPLITUDE)]
    InvalidAmplitude(usize),

    #[error("{what} must not be negative, got {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("battery charge must lie in [0, 100], got [{min}, {max}]")]
    BatteryRange { min: f64, max: f64 },
}

pub type CurveResult<T> = Result<T, CurveError>;
