//! `gps-path` — the three-level path model walked by the navigator.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`segment`] | `Segment` — straight geodesic edge with distance / bearing  |
//! | [`track`]   | `Track` — ordered segments built from a polyline            |
//! | [`route`]   | `Route` — ordered tracks with a running total distance      |
//! | [`error`]   | `PathError`, `PathResult<T>`                                |
//!
//! # Connectivity
//!
//! Connectivity is decided by exact floating-point equality of endpoints,
//! never by tolerance.  The navigator treats a break between consecutive
//! segments or tracks as a hard stop and sends the device offline while it
//! jumps the gap.
//!
//! GeoJSON / GPX adapters build paths through [`Track::new`],
//! [`Route::add_track`] and the property maps; they live outside this crate.

pub mod error;
pub mod route;
pub mod segment;
pub mod track;


pub use error::{PathError, PathResult};
pub use route::Route;
pub use segment::Segment;
pub use track::Track;
