//! `gps-core` — foundational types for the gps telemetry generator.
//!
//! This crate is a dependency of every other `gps-*` crate.  It intentionally
//! has no `gps-*` dependencies and only a handful of external ones (`rand`,
//! `thiserror`, `serde` and `bincode`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`geo`]         | `Point`, haversine distance, bearing, destination point   |
//! | [`ids`]         | `DeviceId`, `RouteId`, `TrackId`, `SensorId`              |
//! | [`color`]       | `Color` (`#rrggbb`)                                       |
//! | [`rng`]         | `SeededRng` (explicit, injectable random source)          |
//! | [`snapshot`]    | `Snapshot` trait, bincode `encode` / `decode`             |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |

pub mod color;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod snapshot;


use std::collections::BTreeMap;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use color::Color;
pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_M, Point, bearing, destination, distance};
pub use ids::{DeviceId, RouteId, SensorId, TrackId};
pub use rng::SeededRng;
pub use snapshot::Snapshot;

/// Free-form string key/value metadata attached to routes, tracks and devices.
///
/// A `BTreeMap` keeps iteration (and therefore snapshot bytes) deterministic.
pub type Properties = BTreeMap<String, String>;
