//! `gps-nav` — the navigation engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`config`]    | `NavigatorConfig` — elevation and offline ranges          |
//! | [`navigator`] | `Navigator`, `NavPhase`, `FIRST_STEP_METERS`              |
//! | [`error`]     | `NavError`, `NavResult<T>`                                |
//!
//! # Movement model
//!
//! ```text
//! advance(tick, speed):
//!   offline countdown > 0      → decrement, no movement
//!   step fits in the segment   → project from the segment start, bump counters
//!   step overflows the segment → land on the segment end, then
//!                                  next segment → next track → next route,
//!                                  going offline across any disconnected gap;
//!                                  past the last route the cursor parks at the
//!                                  path end in `NavPhase::JustFinished`
//! is_finish():
//!   JustFinished → rewind to the start, report `true` once
//! ```

pub mod config;
pub mod error;
pub mod navigator;

#[cfg(test)]
mod tests;

pub use config::NavigatorConfig;
pub use error::{NavError, NavResult};
pub use navigator::{FIRST_STEP_METERS, NavPhase, Navigator};
