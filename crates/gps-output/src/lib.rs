//! `gps-output` — telemetry sinks.
//!
//! | Type              | Role                                                        |
//! |-------------------|-------------------------------------------------------------|
//! | [`OutputWriter`]  | backend trait: state, sensor and packet rows                |
//! | [`CsvWriter`]     | `states.csv`, `sensors.csv`, `packets.csv` in one directory |
//! | [`PacketRecorder`]| `PacketHandler` that decodes packets into an `OutputWriter` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use gps_output::{CsvWriter, PacketRecorder};
//!
//! let recorder = Arc::new(PacketRecorder::new(CsvWriter::new(Path::new("./output"))?));
//! let generator = Generator::new(config, recorder.clone())?;
//! // ... attach, run, close ...
//! recorder.finish()?;
//! if let Some(e) = recorder.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::PacketRecorder;
pub use row::{PacketRow, SensorRow, StateRow};
pub use writer::OutputWriter;
