//! Navigator configuration.

use serde::{Deserialize, Serialize};

use crate::{NavError, NavResult};

/// Elevation curve and offline-excursion settings for one navigator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Elevation floor in metres.
    pub elevation_min: f64,
    /// Elevation ceiling in metres.
    pub elevation_max: f64,
    /// Control-point count of the elevation curve.
    pub elevation_amplitude: usize,
    /// Shortest offline excursion, in ticks.
    pub offline_min: u32,
    /// Longest offline excursion, in ticks.
    pub offline_max: u32,
    /// Never go offline (e.g. a drone that must never go dark).
    pub skip_offline: bool,
}

impl NavigatorConfig {
    pub const MAX_OFFLINE_TICKS: u32 = 900;

    pub fn validate(&self) -> NavResult<()> {
        let (min, max) = (self.offline_min, self.offline_max);
        if min == 0 || min > max || max > Self::MAX_OFFLINE_TICKS {
            return Err(NavError::OfflineRange { min, max });
        }
        Ok(())
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            elevation_min:       0.0,
            elevation_max:       100.0,
            elevation_amplitude: 4,
            offline_min:         1,
            offline_max:         120,
            skip_offline:        false,
        }
    }
}
