//! `gps-curve` — procedural scalar trajectories.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`curve`]   | `Curve`, `CurveMode`, `CurvePoint`, `ControlPoint`        |
//! | [`types`]   | `Speed`, `Battery`, `Sensor` — typed curve wrappers       |
//! | [`error`]   | `CurveError`, `CurveResult<T>`                            |
//!
//! # Curve model
//!
//! A curve of amplitude `n` is a Bezier curve of degree `n - 1` whose control
//! point `i` sits at `(i, y_i)` with `y_i` drawn uniformly from `[min, max]`.
//! Evaluating at `t ∈ [0, 1]` yields a smooth value that never leaves the
//! bounds, because Bernstein weights form a convex combination.
//!
//! Devices evaluate their curves at the fraction of the current lap that has
//! been completed, so each curve plays its whole shape exactly once per lap.

pub mod curve;
pub mod error;
pub mod types;


pub use curve::{ControlPoint, Curve, CurveMode, CurvePoint};
pub use error::{CurveError, CurveResult};
pub use types::{Battery, Sensor, Speed};
