//! Unit tests for gps-nav.

use gps_core::{Point, RouteId, SeededRng, Snapshot, TrackId};
use gps_path::{Route, Track};

use crate::{FIRST_STEP_METERS, NavError, NavPhase, Navigator, NavigatorConfig};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rng() -> SeededRng {
    SeededRng::new(42)
}

/// Straight eastward track of roughly `meters` along the equator, starting at `from`.
fn straight(from: Point, meters: f64) -> Track {
    let mut r = rng();
    Track::new(TrackId::random(&mut r), &[from, from.destination(meters, 90.0)]).unwrap()
}

/// Three-segment polyline heading north, 0.001° per segment.
fn polyline(from: Point) -> Track {
    let mut r = rng();
    let pts: Vec<Point> = (0..4).map(|i| Point::new(from.lat + 0.001 * i as f64, from.lon)).collect();
    Track::new(TrackId::random(&mut r), &pts).unwrap()
}

fn route(tracks: Vec<Track>) -> Route {
    let mut r = rng();
    Route::from_tracks(RouteId::random(&mut r), tracks)
}

fn config(skip_offline: bool) -> NavigatorConfig {
    NavigatorConfig { offline_min: 3, offline_max: 7, skip_offline, ..NavigatorConfig::default() }
}

fn nav(routes: Vec<Route>, skip_offline: bool) -> Navigator {
    Navigator::new(routes, config(skip_offline), rng()).unwrap()
}

/// Connected route: a polyline followed by a straight leg from its end.
fn connected_route() -> Route {
    let a = polyline(Point::new(0.0, 0.0));
    let b = straight(a.last_point(), 150.0);
    route(vec![a, b])
}

// ── Construction ──────────────────────────────────────────────────────────────

mod construction {
    use super::*;

    #[test]
    fn starts_at_first_point() {
        let n = nav(vec![connected_route()], false);
        assert_eq!(n.current_point(), Point::new(0.0, 0.0));
        assert_eq!((n.route_index(), n.track_index(), n.segment_index()), (0, 0, 0));
        assert_eq!(n.current_distance(), 0.0);
        assert_eq!(n.phase(), NavPhase::OnPath);
        assert!(!n.is_offline());
    }

    #[test]
    fn empty_route_rejected() {
        let mut r = rng();
        let empty = Route::new(RouteId::random(&mut r));
        let err = Navigator::new(vec![empty], config(false), rng()).unwrap_err();
        assert!(matches!(err, NavError::EmptyRoute(_)));
    }

    #[test]
    fn offline_range_validated() {
        let zero = NavigatorConfig { offline_min: 0, ..NavigatorConfig::default() };
        let inverted = NavigatorConfig { offline_min: 10, offline_max: 2, ..NavigatorConfig::default() };
        for cfg in [zero, inverted] {
            let err = Navigator::new(vec![], cfg, rng()).unwrap_err();
            assert!(matches!(err, NavError::OfflineRange { .. }));
        }
    }

    #[test]
    fn elevation_range_validated() {
        let cfg = NavigatorConfig { elevation_min: 10.0, elevation_max: 5.0, ..NavigatorConfig::default() };
        let err = Navigator::new(vec![], cfg, rng()).unwrap_err();
        assert!(matches!(err, NavError::Elevation(_)));
    }

    #[test]
    fn idle_navigator_never_moves() {
        let mut n = nav(vec![], false);
        assert!(!n.advance(1.0, 10.0));
        assert!(!n.destination_to(10.0));
        assert!(n.current_segment().is_empty());
        assert!(n.current_route().is_none());
        assert!(!n.is_finish());
        n.to_offline();
        assert!(!n.is_offline());
    }

    #[test]
    fn total_distance_sums_routes() {
        let a = connected_route();
        let b = connected_route();
        let expected = a.distance() + b.distance();
        let n = nav(vec![a, b], false);
        assert!((n.total_distance() - expected).abs() < 1e-9);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

mod movement {
    use super::*;

    #[test]
    fn first_step_projects_fixed_distance() {
        let mut n = nav(vec![route(vec![straight(Point::new(0.0, 0.0), 300.0)])], false);
        assert!(n.advance(1.0, 10.0));
        // Counters take the true step, the point only the fixed first step.
        assert!((n.current_distance() - 10.0).abs() < 1e-9);
        let moved = Point::new(0.0, 0.0).distance_to(n.current_point());
        assert!((moved - FIRST_STEP_METERS).abs() < 1e-6, "moved {moved}");

        assert!(n.advance(1.0, 10.0));
        let moved = Point::new(0.0, 0.0).distance_to(n.current_point());
        assert!((moved - 20.0).abs() < 1e-6, "moved {moved}");
    }

    #[test]
    fn zero_speed_does_not_move() {
        let mut n = nav(vec![connected_route()], false);
        assert!(!n.advance(1.0, 0.0));
        assert_eq!(n.current_distance(), 0.0);
    }

    #[test]
    fn straight_track_scenario() {
        let mut n = nav(vec![route(vec![straight(Point::new(0.0, 0.0), 300.0)])], false);
        let mut finished = false;
        for _ in 0..300 {
            n.advance(1.0, 1.0);
        }
        assert!((n.current_distance() - 300.0).abs() < 2.0, "at {}", n.current_distance());

        // Depending on rounding the end is reached on tick 300 or tick 301.
        for _ in 0..2 {
            if n.is_finish() {
                finished = true;
                break;
            }
            n.advance(1.0, 1.0);
        }
        assert!(finished);
        assert!(!n.is_finish(), "finish must be reported once");
        assert_eq!((n.route_index(), n.track_index(), n.segment_index()), (0, 0, 0));
        assert_eq!(n.current_distance(), 0.0);

        n.to_offline();
        assert!(n.is_offline());
    }

    #[test]
    fn counters_monotone_within_a_lap() {
        let mut n = nav(vec![connected_route(), connected_route()], true);
        let mut r = SeededRng::new(7);
        let mut last = 0.0;
        for _ in 0..2_000 {
            let speed: f64 = r.gen_range(0.0..25.0);
            n.advance(1.0, speed);
            if n.is_finish() {
                last = 0.0;
                continue;
            }
            let d = n.current_distance();
            assert!(d >= last, "distance went back from {last} to {d}");
            assert!(d <= n.total_distance() + 1e-6);
            assert!(n.segment_distance() <= n.current_segment().distance() + 1e-9);
            assert!(n.track_distance() >= n.segment_distance() - 1e-9);
            assert!(n.route_distance() >= n.track_distance() - 1e-9);
            assert!(d >= n.route_distance() - 1e-9);
            last = d;
        }
    }

    #[test]
    fn overflow_lands_on_segment_end() {
        let track = polyline(Point::new(0.0, 0.0));
        let first = track.segments()[0];
        let mut n = nav(vec![route(vec![track])], true);

        n.advance(1.0, first.distance() - 5.0);
        n.advance(1.0, 50.0);
        assert_eq!(n.current_point(), first.end());
        assert_eq!(n.segment_index(), 1);
        assert_eq!(n.segment_distance(), 0.0);
        assert!((n.current_distance() - first.distance()).abs() < 1e-9);
    }

    #[test]
    fn crossing_connected_tracks_stays_online() {
        let r = connected_route();
        let first_len = r.tracks()[0].distance();
        let mut n = nav(vec![r], false);
        while n.track_index() == 0 {
            n.advance(1.0, 20.0);
        }
        assert!(!n.is_offline());
        assert_eq!(n.track_distance(), 0.0);
        assert!((n.route_distance() - first_len).abs() < 1e-9);
    }

    #[test]
    fn disconnected_track_goes_offline() {
        let a = polyline(Point::new(0.0, 0.0));
        let b = straight(Point::new(1.0, 1.0), 100.0);
        let mut n = nav(vec![route(vec![a, b])], false);
        while n.track_index() == 0 {
            n.advance(1.0, 50.0);
        }
        assert!(n.is_offline());
        assert_eq!(n.current_point(), Point::new(1.0, 1.0));
    }

    #[test]
    fn gap_inside_a_track_goes_offline() {
        let north: Vec<Point> = (0..4).map(|i| Point::new(0.001 * i as f64, 0.0)).collect();
        let east = [Point::new(1.0, 1.0), Point::new(1.0, 1.001)];
        let track = Track::from_polylines(TrackId::random(&mut rng()), &[&north[..], &east[..]]).unwrap();
        let mut n = nav(vec![route(vec![track])], false);
        while n.segment_index() < 3 {
            assert!(!n.is_offline());
            n.advance(1.0, 50.0);
        }
        assert_eq!(n.track_index(), 0);
        assert!(n.is_offline());
        assert_eq!(n.current_point(), Point::new(1.0, 1.0));
    }

    #[test]
    fn skip_offline_suppresses_gaps() {
        let a = polyline(Point::new(0.0, 0.0));
        let b = straight(Point::new(1.0, 1.0), 100.0);
        let mut n = nav(vec![route(vec![a, b])], true);
        while n.track_index() == 0 {
            n.advance(1.0, 50.0);
        }
        assert!(!n.is_offline());
        n.to_offline();
        assert!(!n.is_offline());
    }

    #[test]
    fn next_route_resets_route_counter() {
        let mut n = nav(vec![connected_route(), connected_route()], true);
        let first_len = n.routes()[0].distance();
        while n.route_index() == 0 {
            n.advance(1.0, 30.0);
        }
        assert_eq!(n.route_distance(), 0.0);
        assert!((n.current_distance() - first_len).abs() < 1e-9);
    }

    #[test]
    fn unconsumed_finish_starts_next_lap() {
        let mut n = nav(vec![route(vec![straight(Point::new(0.0, 0.0), 50.0)])], true);
        while n.phase() != NavPhase::JustFinished {
            n.advance(1.0, 10.0);
        }
        assert!(n.advance(1.0, 10.0));
        assert_eq!(n.phase(), NavPhase::OnPath);
        assert!((n.current_distance() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn elevation_stays_in_range() {
        let mut n = nav(vec![connected_route()], true);
        for _ in 0..500 {
            n.advance(1.0, 3.0);
            n.is_finish();
            let e = n.elevation();
            assert!((0.0..=100.0).contains(&e), "elevation {e}");
        }
    }
}

// ── Offline ───────────────────────────────────────────────────────────────────

mod offline {
    use super::*;

    #[test]
    fn countdown_is_exact() {
        let cfg = NavigatorConfig { offline_min: 5, offline_max: 5, ..NavigatorConfig::default() };
        let mut n = Navigator::new(vec![connected_route()], cfg, rng()).unwrap();
        n.to_offline();
        assert_eq!(n.offline_remaining(), 5);
        for remaining in (0..5).rev() {
            assert!(!n.advance(1.0, 10.0));
            assert_eq!(n.offline_remaining(), remaining);
        }
        assert!(!n.is_offline());
        assert!(n.advance(1.0, 10.0));
    }

    #[test]
    fn duration_within_range() {
        let mut n = nav(vec![connected_route()], false);
        for _ in 0..100 {
            n.to_offline();
            assert!((3..=7).contains(&n.offline_remaining()));
        }
    }

    #[test]
    fn reset_clears_offline() {
        let mut n = nav(vec![connected_route()], false);
        n.advance(1.0, 40.0);
        n.to_offline();
        n.reset();
        assert!(!n.is_offline());
        assert_eq!(n.current_distance(), 0.0);
        assert_eq!(n.current_point(), Point::new(0.0, 0.0));
    }
}

// ── Jumps ─────────────────────────────────────────────────────────────────────

mod jumps {
    use super::*;

    /// Sum of the lengths before the cursor, recomputed from the indices.
    fn passed(n: &Navigator) -> f64 {
        let routes: f64 = n.routes()[..n.route_index()].iter().map(Route::distance).sum();
        let route = &n.routes()[n.route_index()];
        let tracks: f64 = route.tracks()[..n.track_index()].iter().map(Track::distance).sum();
        let track = &route.tracks()[n.track_index()];
        let segs: f64 = track.segments()[..n.segment_index()].iter().map(|s| s.distance()).sum();
        routes + tracks + segs
    }

    #[test]
    fn lands_on_requested_distance() {
        let mut n = nav(vec![connected_route(), connected_route()], true);
        let total = n.total_distance();
        for d in [1.0, 50.0, 111.0, 333.3, 400.0, total / 2.0, total - 0.5, total] {
            assert!(n.destination_to(d));
            assert!((n.current_distance() - d).abs() < 1e-6, "wanted {d}, at {}", n.current_distance());
            assert!(n.segment_distance() <= n.current_segment().distance() + 1e-9);
            let recomputed = passed(&n) + n.segment_distance();
            assert!((recomputed - n.current_distance()).abs() < 1e-6);
            let expected = n.current_segment().point_at(n.segment_distance());
            assert!(expected.distance_to(n.current_point()) < 1e-6);
        }
    }

    #[test]
    fn clamps_past_the_end() {
        let mut n = nav(vec![connected_route()], true);
        let total = n.total_distance();
        assert!(n.destination_to(total + 1_000.0));
        assert!((n.current_distance() - total).abs() < 1e-6);
        assert_eq!(n.track_index(), 1);
    }

    #[test]
    fn below_one_meter_rejected() {
        let mut n = nav(vec![connected_route()], true);
        n.advance(1.0, 20.0);
        let before = n.current_distance();
        assert!(!n.destination_to(0.5));
        assert!(!n.destination_to(f64::NAN));
        assert_eq!(n.current_distance(), before);
    }

    #[test]
    fn jump_clears_pending_finish() {
        let mut n = nav(vec![route(vec![straight(Point::new(0.0, 0.0), 30.0)])], true);
        while n.phase() != NavPhase::JustFinished {
            n.advance(1.0, 10.0);
        }
        assert!(n.destination_to(5.0));
        assert!(!n.is_finish());
    }
}

// ── Structure ─────────────────────────────────────────────────────────────────

mod structure {
    use super::*;

    #[test]
    fn add_and_remove_routes() {
        let mut n = nav(vec![], true);
        let r = connected_route();
        let id = r.id();
        let len = r.distance();

        n.add_route(r).unwrap();
        assert_eq!(n.version(), 1);
        assert_eq!(n.num_routes(), 1);
        assert!((n.total_distance() - len).abs() < 1e-9);
        assert_eq!(n.current_point(), Point::new(0.0, 0.0));

        n.advance(1.0, 20.0);
        assert!(n.remove_route(id));
        assert_eq!(n.version(), 2);
        assert_eq!(n.total_distance(), 0.0);
        assert_eq!(n.current_distance(), 0.0);
        assert!(!n.remove_route(id));
        assert_eq!(n.version(), 2);
    }

    #[test]
    fn add_empty_route_rejected() {
        let mut n = nav(vec![], true);
        let mut r = rng();
        assert!(n.add_route(Route::new(RouteId::random(&mut r))).is_err());
        assert_eq!(n.version(), 0);
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

mod snapshot {
    use super::*;

    #[test]
    fn restores_cursor() {
        let mut n = nav(vec![connected_route(), connected_route()], false);
        for _ in 0..25 {
            n.advance(1.0, 12.0);
        }
        let bytes = n.snapshot().unwrap();
        let back = Navigator::restore_from_snapshot(&bytes).unwrap();
        assert_eq!(back, n);
        assert_eq!(back.current_point(), n.current_point());
        assert_eq!(back.current_distance(), n.current_distance());
        assert_eq!(
            (back.route_index(), back.track_index(), back.segment_index()),
            (n.route_index(), n.track_index(), n.segment_index())
        );
        assert_eq!(back.offline_remaining(), n.offline_remaining());
        assert_eq!(back.config(), n.config());
    }

    #[test]
    fn garbage_rejected() {
        assert!(Navigator::restore_from_snapshot(&[0xff, 0x01, 0x02]).is_err());
    }
}
