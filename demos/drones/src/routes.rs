//! Patrol routes around a harbour.
//!
//! Three closed loops near the Port of Hamburg, each built from one or two
//! tracks.  Every loop ends where it starts so drones can lap forever.

use anyhow::Result;
use gps_core::{Point, RouteId, SeededRng, TrackId};
use gps_path::{Route, Track};

/// Build the three patrol routes, ids drawn from `seed`.
///
/// Returns `[quay, basin, river]`.
pub fn build_routes(seed: u64) -> Result<[Route; 3]> {
    let mut rng = SeededRng::new(seed);

    let quay_out = [
        Point::new(53.5410, 9.9690),
        Point::new(53.5425, 9.9755),
        Point::new(53.5440, 9.9840),
    ];
    let quay_back = [
        Point::new(53.5440, 9.9840),
        Point::new(53.5395, 9.9830),
        Point::new(53.5410, 9.9690),
    ];
    let quay = Route::from_tracks(
        RouteId::random(&mut rng),
        [
            Track::new(TrackId::random(&mut rng), &quay_out)?,
            Track::new(TrackId::random(&mut rng), &quay_back)?,
        ],
    );

    let basin_pts = [
        Point::new(53.5300, 9.9650),
        Point::new(53.5300, 9.9750),
        Point::new(53.5350, 9.9750),
        Point::new(53.5350, 9.9650),
        Point::new(53.5300, 9.9650),
    ];
    let basin = Route::from_tracks(
        RouteId::random(&mut rng),
        [Track::new(TrackId::random(&mut rng), &basin_pts)?],
    );

    let river_pts = [
        Point::new(53.5450, 9.9300),
        Point::new(53.5470, 9.9500),
        Point::new(53.5455, 9.9650),
        Point::new(53.5430, 9.9500),
        Point::new(53.5450, 9.9300),
    ];
    let river = Route::from_tracks(
        RouteId::random(&mut rng),
        [Track::new(TrackId::random(&mut rng), &river_pts)?],
    );

    Ok([quay, basin, river])
}
