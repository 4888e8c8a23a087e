//! `gps-device` — one simulated moving device.
//!
//! A [`Device`] binds a [`gps_nav::Navigator`] to three families of curves
//! (speed, battery, named sensors) and advances them together once per tick.
//! Curves are evaluated at the lap-completion ratio `loop / avg_ticks`, so
//! each curve traces its full shape exactly once per traversal of the path.
//!
//! | Module      | Contents                                     |
//! |-------------|----------------------------------------------|
//! | [`builder`] | `DeviceBuilder`, `SensorConfig`              |
//! | [`device`]  | `Device` and its validation limits           |
//! | [`state`]   | `State`, `SensorReading` — pooled snapshots  |
//! | [`error`]   | `DeviceError`, `DeviceResult<T>`             |

pub mod builder;
pub mod device;
pub mod error;
pub mod state;


pub use builder::{DeviceBuilder, SensorConfig};
pub use device::Device;
pub use error::{DeviceError, DeviceResult};
pub use state::{SensorReading, State};
