//! Integration tests for gps-output.

use std::sync::Arc;

use gps_core::{DeviceId, Point, RouteId, SeededRng, TrackId};
use gps_device::{Device, DeviceBuilder, SensorConfig};
use gps_path::{Route, Track};
use tempfile::TempDir;

use crate::csv::CsvWriter;
use crate::row::{PacketRow, SensorRow, StateRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, PacketRecorder};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn state_row(tick: u64) -> StateRow {
    StateRow {
        device_id: DeviceId(1),
        packet:    tick,
        tick,
        online:    true,
        lat:       52.5,
        lon:       13.4,
        elevation: 35.0,
        bearing:   90.0,
        speed:     4.2,
        battery:   80.0,
        distance:  tick as f64 * 4.2,
    }
}

fn device(seed: u64) -> Device {
    let mut rng = SeededRng::new(seed);
    let pts = [Point::new(0.0, 0.0), Point::new(0.0, 0.01), Point::new(0.01, 0.01)];
    let track = Track::new(TrackId::random(&mut rng), &pts).unwrap();
    DeviceBuilder::new("tracker")
        .route(Route::from_tracks(RouteId::random(&mut rng), [track]))
        .sensor(SensorConfig::new("temperature", -5.0, 35.0, 6))
        .skip_offline(true)
        .seed(seed)
        .build()
        .unwrap()
}

fn headers(path: &std::path::Path) -> Vec<String> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.headers().unwrap().iter().map(str::to_owned).collect()
}

fn count_rows(path: &std::path::Path) -> usize {
    csv::Reader::from_path(path).unwrap().records().count()
}

mod csv_tests {
    use super::*;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("states.csv").exists());
        assert!(dir.path().join("sensors.csv").exists());
        assert!(dir.path().join("packets.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(&dir.path().join("states.csv")),
            [
                "device_id", "packet", "tick", "online", "lat", "lon", "elevation", "bearing",
                "speed", "battery", "distance"
            ]
        );
        assert_eq!(headers(&dir.path().join("sensors.csv")), ["device_id", "tick", "name", "x", "y"]);
        assert_eq!(headers(&dir.path().join("packets.csv")), ["runner", "tick", "states", "bytes"]);
    }

    #[test]
    fn csv_state_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_states(&[state_row(1), state_row(2)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("states.csv")).unwrap();
        let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], DeviceId(1).to_string());
        assert_eq!(&records[1][2], "2");
        assert_eq!(&records[0][3], "1");
        assert_eq!(&records[0][4], "52.5000000");
    }

    #[test]
    fn csv_sensor_and_packet_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_sensors(&[SensorRow {
            device_id: DeviceId(2),
            tick:      7,
            name:      "humidity".into(),
            x:         0.25,
            y:         41.5,
        }])
        .unwrap();
        w.write_packet(&PacketRow { runner: 3, tick: 9, states: 12, bytes: 640 }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("sensors.csv")).unwrap();
        let rec = rdr.records().next().unwrap().unwrap();
        assert_eq!(&rec[2], "humidity");
        assert_eq!(&rec[4], "41.5000");

        let mut rdr = csv::Reader::from_path(dir.path().join("packets.csv")).unwrap();
        let rec = rdr.records().next().unwrap().unwrap();
        assert_eq!(rec.iter().collect::<Vec<_>>(), ["3", "9", "12", "640"]);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

mod recorder {
    use gps_device::State;
    use gps_sched::{Packet, PacketHandler};

    use super::*;

    /// Collects rows in memory; optionally fails every state write.
    #[derive(Default)]
    struct MemWriter {
        states:   Vec<StateRow>,
        sensors:  Vec<SensorRow>,
        packets:  Vec<PacketRow>,
        fail:     bool,
        finishes: usize,
    }

    impl OutputWriter for MemWriter {
        fn write_states(&mut self, rows: &[StateRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.states.extend_from_slice(rows);
            Ok(())
        }

        fn write_sensors(&mut self, rows: &[SensorRow]) -> OutputResult<()> {
            self.sensors.extend_from_slice(rows);
            Ok(())
        }

        fn write_packet(&mut self, row: &PacketRow) -> OutputResult<()> {
            self.packets.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    fn packet(states: Vec<State>) -> Vec<u8> {
        Packet { runner: 1, tick: 4, states }.encode().unwrap()
    }

    #[test]
    fn decodes_states_and_sensors() {
        let mut d = device(3);
        d.next(1.0);
        let bytes = packet(vec![d.state(), d.state()]);

        let rec = PacketRecorder::new(MemWriter::default());
        rec.on_packet(&bytes);
        assert!(rec.take_error().is_none());
        assert_eq!(rec.packets(), 1);
        assert_eq!(rec.states(), 2);

        let w = rec.into_writer();
        assert_eq!(w.states.len(), 2);
        assert_eq!(w.states[0], StateRow::from_state(4, &d.state()));
        assert_eq!(w.sensors.len(), 2);
        assert_eq!(w.sensors[0].name, "temperature");
        assert_eq!(w.packets, [PacketRow { runner: 1, tick: 4, states: 2, bytes: bytes.len() as u64 }]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let rec = PacketRecorder::new(MemWriter::default());
        rec.on_packet(&[0xff, 0xff, 0xff]);
        assert!(matches!(rec.take_error(), Some(OutputError::Decode(_))));
        assert!(rec.take_error().is_none());
        assert_eq!(rec.packets(), 0);
    }

    #[test]
    fn first_error_kept() {
        let rec = PacketRecorder::new(MemWriter { fail: true, ..Default::default() });
        let d = device(4);
        rec.on_packet(&packet(vec![d.state()]));
        rec.on_packet(&[0xff]);
        assert!(matches!(rec.take_error(), Some(OutputError::Io(_))));
    }

    #[test]
    fn finish_reaches_writer() {
        let rec = PacketRecorder::new(MemWriter::default());
        rec.finish().unwrap();
        assert_eq!(rec.into_writer().finishes, 1);
    }
}

mod end_to_end {
    use std::time::Duration;

    use gps_sched::{Generator, GeneratorConfig};

    use super::*;

    #[test]
    fn generator_writes_csv() {
        let dir = tmp();
        let recorder = Arc::new(PacketRecorder::new(CsvWriter::new(dir.path()).unwrap()));
        let config = GeneratorConfig { interval: Duration::from_millis(10), num_runners: Some(2) };
        let generator = Generator::new(config, recorder.clone()).unwrap();
        for seed in 0..4 {
            generator.attach(device(seed)).unwrap();
        }

        // Shells come back from consumers asynchronously; keep sweeping until every
        // device has shown up at least once.
        for _ in 0..500 {
            generator.step(1.0);
            if recorder.states() >= 4 {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        generator.close();
        recorder.finish().unwrap();
        assert!(recorder.take_error().is_none());

        let written = count_rows(&dir.path().join("states.csv"));
        assert!(written >= 4, "only {written} state rows");
        assert_eq!(written as u64, recorder.states());
        assert_eq!(count_rows(&dir.path().join("sensors.csv")), written);
        assert_eq!(count_rows(&dir.path().join("packets.csv")) as u64, recorder.packets());
    }
}
