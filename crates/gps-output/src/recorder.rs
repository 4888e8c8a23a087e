//! `PacketRecorder<W>` bridges `PacketHandler` to an `OutputWriter`.

use std::sync::{Mutex, PoisonError};

use gps_sched::{Packet, PacketHandler, SchedError};

use crate::row::{PacketRow, SensorRow, StateRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

struct Inner<W> {
    writer:     W,
    packets:    u64,
    states:     u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> Inner<W> {
    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn record(&mut self, bytes: &[u8]) -> OutputResult<()> {
        let packet = Packet::decode(bytes)?;
        self.packets += 1;
        self.states += packet.states.len() as u64;

        let states: Vec<StateRow> =
            packet.states.iter().map(|s| StateRow::from_state(packet.tick, s)).collect();
        let sensors: Vec<SensorRow> = packet
            .states
            .iter()
            .flat_map(|s| s.sensors.iter().map(move |r| SensorRow::from_reading(s.id, s.tick, r)))
            .collect();

        self.writer.write_packet(&PacketRow {
            runner: packet.runner,
            tick:   packet.tick,
            states: packet.states.len() as u64,
            bytes:  bytes.len() as u64,
        })?;
        if !states.is_empty() {
            self.writer.write_states(&states)?;
        }
        if !sensors.is_empty() {
            self.writer.write_sensors(&sensors)?;
        }
        Ok(())
    }
}

/// A [`PacketHandler`] that decodes every packet and writes its states to
/// any [`OutputWriter`] backend.
///
/// Runners call the handler from their own threads, so the writer sits
/// behind a mutex.  Errors are stored because `PacketHandler` methods have
/// no return value; check them with [`take_error`][Self::take_error] after
/// closing the generator.
pub struct PacketRecorder<W: OutputWriter> {
    inner: Mutex<Inner<W>>,
}

impl<W: OutputWriter> PacketRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { inner: Mutex::new(Inner { writer, packets: 0, states: 0, last_error: None }) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Packets decoded so far.
    pub fn packets(&self) -> u64 {
        self.lock().packets
    }

    /// States written so far.
    pub fn states(&self) -> u64 {
        self.lock().states
    }

    /// Flush the writer.  Idempotent.
    pub fn finish(&self) -> OutputResult<()> {
        self.lock().writer.finish()
    }

    /// Take the stored error (if any).
    ///
    /// Returns `None` if every packet was recorded.
    pub fn take_error(&self) -> Option<OutputError> {
        self.lock().last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner).writer
    }
}

impl<W: OutputWriter> PacketHandler for PacketRecorder<W> {
    fn on_error(&self, err: &SchedError) {
        log::warn!("packet lost: {err}");
    }

    fn on_packet(&self, bytes: &[u8]) {
        let mut inner = self.lock();
        let result = inner.record(bytes);
        if let Err(e) = &result {
            log::error!("failed to record packet: {e}");
        }
        inner.store_err(result);
    }
}
