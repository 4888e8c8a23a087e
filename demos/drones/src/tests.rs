//! Unit tests for the drones demo.

use gps_device::State;

use crate::position_row;

#[test]
fn position_row_shows_lap_distance() {
    let state = State {
        model: "drone-03".into(),
        online: true,
        lat: 51.5,
        lon: -0.12,
        battery: 87.25,
        distance: 412.5,
        total_distance: 9876.0,
        ..State::default()
    };
    let row = position_row(&state);
    assert!(row.starts_with("drone-03"));
    assert!(row.ends_with("   412.5"));
    assert!(!row.contains("9876"));
}
