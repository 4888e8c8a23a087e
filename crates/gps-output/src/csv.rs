//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `states.csv`
//! - `sensors.csv`
//! - `packets.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, PacketRow, SensorRow, StateRow};

/// Writes telemetry to three CSV files.
pub struct CsvWriter {
    states:   Writer<File>,
    sensors:  Writer<File>,
    packets:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut states = Writer::from_path(dir.join("states.csv"))?;
        states.write_record([
            "device_id", "packet", "tick", "online", "lat", "lon", "elevation", "bearing", "speed",
            "battery", "distance",
        ])?;

        let mut sensors = Writer::from_path(dir.join("sensors.csv"))?;
        sensors.write_record(["device_id", "tick", "name", "x", "y"])?;

        let mut packets = Writer::from_path(dir.join("packets.csv"))?;
        packets.write_record(["runner", "tick", "states", "bytes"])?;

        Ok(Self { states, sensors, packets, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_states(&mut self, rows: &[StateRow]) -> OutputResult<()> {
        for row in rows {
            self.states.write_record(&[
                row.device_id.to_string(),
                row.packet.to_string(),
                row.tick.to_string(),
                (row.online as u8).to_string(),
                format!("{:.7}", row.lat),
                format!("{:.7}", row.lon),
                format!("{:.2}", row.elevation),
                format!("{:.2}", row.bearing),
                format!("{:.3}", row.speed),
                format!("{:.2}", row.battery),
                format!("{:.3}", row.distance),
            ])?;
        }
        Ok(())
    }

    fn write_sensors(&mut self, rows: &[SensorRow]) -> OutputResult<()> {
        for row in rows {
            self.sensors.write_record(&[
                row.device_id.to_string(),
                row.tick.to_string(),
                row.name.clone(),
                format!("{:.4}", row.x),
                format!("{:.4}", row.y),
            ])?;
        }
        Ok(())
    }

    fn write_packet(&mut self, row: &PacketRow) -> OutputResult<()> {
        self.packets.write_record(&[
            row.runner.to_string(),
            row.tick.to_string(),
            row.states.to_string(),
            row.bytes.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.states.flush()?;
        self.sensors.flush()?;
        self.packets.flush()?;
        Ok(())
    }
}
