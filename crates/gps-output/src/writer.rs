//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, PacketRow, SensorRow, StateRow};

/// Trait implemented by output backends.
///
/// Writers are driven from runner threads through a lock, hence `Send`.
/// Errors are stored by [`PacketRecorder`](crate::PacketRecorder) and
/// retrieved with its `take_error`.
pub trait OutputWriter: Send {
    /// Write a batch of device states.
    fn write_states(&mut self, rows: &[StateRow]) -> OutputResult<()>;

    /// Write a batch of sensor readings.
    fn write_sensors(&mut self, rows: &[SensorRow]) -> OutputResult<()>;

    /// Write one packet summary row.
    fn write_packet(&mut self, row: &PacketRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
