//! drones — a small fleet of patrol drones streaming telemetry.
//!
//! Builds a handful of devices on three harbour patrol loops, attaches them
//! to a generator and records every packet to CSV for a few seconds of
//! wall-clock time.  Set `RUST_LOG=debug` to watch runners and consumers.

mod routes;
#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use gps_core::{Color, SeededRng};
use gps_curve::CurveMode;
use gps_device::{DeviceBuilder, SensorConfig, State};
use gps_output::{CsvWriter, PacketRecorder};
use gps_sched::{Generator, GeneratorConfig};

use routes::build_routes;

// ── Constants ─────────────────────────────────────────────────────────────────

const DRONE_COUNT: usize    = 12;
const SEED:        u64      = 42;
const INTERVAL:    Duration = Duration::from_millis(100); // 1 tick = 1 s of flight
const RUN_FOR:     Duration = Duration::from_secs(5);
const OUTPUT_DIR:  &str     = "output/drones";

const PALETTE: [Color; 3] = [Color::rgb(230, 57, 70), Color::rgb(42, 157, 143), Color::rgb(233, 196, 106)];
const ROUTE_NAMES: [&str; 3] = ["quay", "basin", "river"];

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== drones — gps telemetry generator ===");
    println!("Drones: {DRONE_COUNT}  |  Interval: {INTERVAL:?}  |  Seed: {SEED}");
    println!();

    // 1. Routes.
    let routes = build_routes(SEED)?;
    for (name, route) in ROUTE_NAMES.iter().zip(&routes) {
        println!("Route {name:<6} {:>3} tracks  {:>8.1} m", route.tracks().len(), route.distance());
    }
    println!();

    // 2. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let recorder = Arc::new(PacketRecorder::new(CsvWriter::new(Path::new(OUTPUT_DIR))?));

    // 3. Generator.
    let config = GeneratorConfig { interval: INTERVAL, num_runners: None };
    let generator = Generator::new(config, recorder.clone())?;
    println!("Runners: {}", generator.num_runners());

    // 4. Fleet.  Drone i patrols route i % 3; every fourth drone flies the
    //    quay and the basin back to back.
    let mut ids = Vec::with_capacity(DRONE_COUNT);
    for i in 0..DRONE_COUNT {
        let home = i % routes.len();
        let mut builder = DeviceBuilder::new(format!("hx-{:02}", i + 1))
            .user_id(format!("pilot-{}", i % 4))
            .description(format!("{} patrol", ROUTE_NAMES[home]))
            .color(PALETTE[home])
            .prop("route", ROUTE_NAMES[home])
            .route(routes[home].clone())
            .speed(4.0, 18.0, 8)
            .battery(15.0, 100.0, 4)
            .elevation(20.0, 120.0, 6)
            .offline(3, 15)
            .sensor(SensorConfig::new("temperature", 4.0, 22.0, 6))
            .sensor(SensorConfig::new("wind", 0.0, 14.0, 10).mode(CurveMode::MIN_START))
            .seed(SeededRng::for_stream(SEED, i as u64).seed());
        if i % 4 == 3 {
            builder = builder.route(routes[(home + 1) % routes.len()].clone());
        }
        let drone = builder.build()?;
        ids.push(drone.id());
        generator.attach(drone)?;
    }
    println!("Attached {} drones", generator.num_devices());
    println!();

    // 5. Run.
    log::info!("recording to {OUTPUT_DIR} for {RUN_FOR:?}");
    let t0 = Instant::now();
    generator.run()?;
    std::thread::sleep(RUN_FOR);
    generator.close();
    let elapsed = t0.elapsed();

    recorder.finish()?;
    if let Some(e) = recorder.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Ran for {:.3} s", elapsed.as_secs_f64());
    println!("  packets.csv : {} rows", recorder.packets());
    println!("  states.csv  : {} rows", recorder.states());
    println!();

    // 7. Final drone positions.
    println!(
        "{:<8} {:<7} {:>11} {:>11} {:>8} {:>8}",
        "Drone", "Online", "Lat", "Lon", "Battery", "Dist m"
    );
    println!("{}", "-".repeat(58));
    for id in ids {
        let Some(state) = generator.lookup(id) else {
            continue;
        };
        println!("{}", position_row(&state));
    }

    Ok(())
}

/// One line of the final position table.  The distance column is the
/// distance covered in the current lap.
fn position_row(state: &State) -> String {
    format!(
        "{:<8} {:<7} {:>11.6} {:>11.6} {:>7.1}% {:>8.1}",
        state.model,
        if state.online { "yes" } else { "no" },
        state.lat,
        state.lon,
        state.battery,
        state.distance,
    )
}
