//! Plain data row types written by output backends.

use gps_core::DeviceId;
use gps_device::{SensorReading, State};

/// One delivered device state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateRow {
    pub device_id: DeviceId,
    /// Sweep counter of the packet that carried the state.
    pub packet:    u64,
    /// The device's own tick counter.
    pub tick:      u64,
    pub online:    bool,
    pub lat:       f64,
    pub lon:       f64,
    pub elevation: f64,
    pub bearing:   f64,
    pub speed:     f64,
    pub battery:   f64,
    pub distance:  f64,
}

impl StateRow {
    pub fn from_state(packet: u64, s: &State) -> Self {
        Self {
            device_id: s.id,
            packet,
            tick:      s.tick,
            online:    s.online,
            lat:       s.lat,
            lon:       s.lon,
            elevation: s.elevation,
            bearing:   s.bearing,
            speed:     s.speed,
            battery:   s.battery,
            distance:  s.distance,
        }
    }
}

/// One sensor reading of a delivered state.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRow {
    pub device_id: DeviceId,
    pub tick:      u64,
    pub name:      String,
    pub x:         f64,
    pub y:         f64,
}

impl SensorRow {
    pub fn from_reading(device_id: DeviceId, tick: u64, r: &SensorReading) -> Self {
        Self { device_id, tick, name: r.name.clone(), x: r.x, y: r.y }
    }
}

/// Summary of one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRow {
    pub runner: usize,
    pub tick:   u64,
    pub states: u64,
    pub bytes:  u64,
}
