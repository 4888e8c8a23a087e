//! Per-tick device snapshot.

use gps_core::{DeviceId, SensorId};
use serde::{Deserialize, Serialize};

/// One sensor reading inside a [`State`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id:   SensorId,
    pub name: String,
    /// Position on the curve axis.
    pub x:    f64,
    /// The reading.
    pub y:    f64,
}

/// Everything a consumer learns about a device on one tick.
///
/// A `State` is a reusable shell: [`Device::fill_state`](crate::Device::fill_state)
/// overwrites it in place, keeping string and vector capacity, so the
/// scheduler can cycle the same object between a device and its consumer
/// without allocating per tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id:             DeviceId,
    pub user_id:        String,
    pub model:          String,
    /// Number of ticks this device has been advanced.
    pub tick:           u64,
    pub online:         bool,
    pub lat:            f64,
    pub lon:            f64,
    pub elevation:      f64,
    pub bearing:        f64,
    pub speed:          f64,
    pub battery:        f64,
    pub distance:       f64,
    pub total_distance: f64,
    pub route_index:    usize,
    pub track_index:    usize,
    pub segment_index:  usize,
    pub sensors:        Vec<SensorReading>,
}
