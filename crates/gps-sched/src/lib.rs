//! `gps-sched` — the concurrent scheduling core.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`config`]    | `GeneratorConfig` — interval, runner count                  |
//! | [`generator`] | `Generator` — owns the runners, routes attach/detach        |
//! | [`runner`]    | `Runner` — device map, ticker loop, per-device consumers    |
//! | [`packet`]    | `Packet`, `PacketHandler`, `NoopHandler`                    |
//! | [`shard`]     | `shard()` — FNV-1a device-to-runner assignment              |
//! | [`error`]     | `SchedError`, `SchedResult<T>`                              |
//!
//! # Threads
//!
//! ```text
//! gps-runner-N     tick → read-lock map → device.next() for each device
//!                       → hand the state to its consumer if it is ready
//!                       → this sweep's handed-off states as one Packet → on_packet
//! gps-consumer-ID  state channel → on_state → shell back on ready channel
//! ```
//!
//! Each device owns exactly one pooled [`State`](gps_device::State) shell.
//! The shell travels runner → consumer → runner; while the consumer holds it
//! the runner skips the hand-off, so under load intermediate ticks are
//! dropped and the next delivered state is the latest one.

pub mod config;
pub mod error;
pub mod generator;
pub mod packet;
pub mod runner;
pub mod shard;


pub use config::GeneratorConfig;
pub use error::{SchedError, SchedResult};
pub use generator::Generator;
pub use packet::{NoopHandler, Packet, PacketHandler};
pub use runner::Runner;
pub use shard::{fnv1a, shard};
