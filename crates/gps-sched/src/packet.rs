//! Packets and the callbacks that receive them.

use gps_core::CoreResult;
use gps_core::snapshot::{decode, encode};
use gps_device::State;
use serde::{Deserialize, Serialize};

use crate::SchedError;

/// The states one runner handed to its consumers during one sweep.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Index of the runner that produced the packet.
    pub runner: usize,
    /// The runner's sweep counter at flush time.
    pub tick:   u64,
    pub states: Vec<State>,
}

impl Packet {
    pub fn encode(&self) -> CoreResult<Vec<u8>> {
        encode(self)
    }

    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        decode(bytes)
    }
}

/// Callbacks invoked by the runners.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Runners call them from their own
/// threads, so implementations must be `Send + Sync`.
///
/// # Example: packet counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl PacketHandler for Counter {
///     fn on_packet(&self, _bytes: &[u8]) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait PacketHandler: Send + Sync {
    /// Once per scheduling tick, before the sweep.
    fn on_tick(&self) {}

    /// A sweep could not produce its packet.
    fn on_error(&self, _err: &SchedError) {}

    /// An encoded [`Packet`]; decode with [`Packet::decode`].
    fn on_packet(&self, _bytes: &[u8]) {}

    /// One device's state, on that device's consumer thread.  The runner
    /// skips the device's hand-off until this returns, so a slow callback
    /// coalesces that device's ticks without stalling the others.
    fn on_state(&self, _state: &State) {}
}

/// A [`PacketHandler`] that does nothing.
pub struct NoopHandler;

impl PacketHandler for NoopHandler {}
