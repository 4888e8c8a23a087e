//! The navigation cursor.

use gps_core::{CoreError, CoreResult, Point, RouteId, SeededRng, Snapshot};
use gps_curve::{CurveMode, Sensor};
use gps_path::{Route, Segment, Track};
use serde::{Deserialize, Serialize};

use crate::{NavError, NavResult, NavigatorConfig};

/// Distance projected along a segment on the first step onto it, regardless
/// of the true step length.  The counters still advance by the true step.
pub const FIRST_STEP_METERS: f64 = 1.0;

/// Where the cursor stands relative to the end of its path set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavPhase {
    #[default]
    OnPath,
    /// Parked on the end of the last route; cleared by [`Navigator::is_finish`].
    JustFinished,
}

/// A resolved position: indices plus the lengths passed before it at each level.
#[derive(Copy, Clone, Debug)]
struct Cursor {
    route:        usize,
    track:        usize,
    segment:      usize,
    before_route: f64,
    before_track: f64,
    before_seg:   f64,
    along:        f64,
}

// ── Navigator ─────────────────────────────────────────────────────────────────

/// Stateful cursor over an ordered set of routes.
///
/// Position is tracked as indices (route, track, segment) plus four
/// cumulative distance counters.  The counters always agree with the indices:
/// `segment_distance <= segment length`, and each wider counter is the sum of
/// the lengths of everything already passed at that level plus the narrower
/// counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Navigator {
    routes: Vec<Route>,

    route_index:   usize,
    track_index:   usize,
    segment_index: usize,

    segment_distance: f64,
    track_distance:   f64,
    route_distance:   f64,
    current_distance: f64,
    total_distance:   f64,

    offline_index: u32,
    point:         Point,
    elevation:     Sensor,
    phase:         NavPhase,
    version:       u64,
    config:        NavigatorConfig,
    rng:           SeededRng,
}

impl Navigator {
    /// Build a navigator over `routes`.  An empty route list is allowed and
    /// yields an idle navigator that never moves.
    pub fn new(routes: Vec<Route>, config: NavigatorConfig, mut rng: SeededRng) -> NavResult<Self> {
        config.validate()?;
        if let Some(route) = routes.iter().find(|r| r.is_empty()) {
            return Err(NavError::EmptyRoute(route.id()));
        }
        let elevation = Sensor::new(
            "elevation",
            config.elevation_min,
            config.elevation_max,
            config.elevation_amplitude,
            CurveMode::DEFAULT,
            &mut rng,
        )?;

        let mut nav = Self {
            routes,
            route_index: 0,
            track_index: 0,
            segment_index: 0,
            segment_distance: 0.0,
            track_distance: 0.0,
            route_distance: 0.0,
            current_distance: 0.0,
            total_distance: 0.0,
            offline_index: 0,
            point: Point::default(),
            elevation,
            phase: NavPhase::OnPath,
            version: 0,
            config,
            rng,
        };
        nav.total_distance = nav.sum_distance();
        nav.rewind();
        Ok(nav)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Advance by `tick * speed` metres.  Returns `true` when the position
    /// changed.
    ///
    /// While offline the call only counts the excursion down.  A step that
    /// overflows the current segment lands exactly on its end; the unspent
    /// remainder is dropped and the next call starts on the following
    /// segment.
    pub fn advance(&mut self, tick: f64, speed: f64) -> bool {
        if self.routes.is_empty() {
            return false;
        }
        if self.offline_index > 0 {
            self.offline_index -= 1;
            return false;
        }
        if self.phase == NavPhase::JustFinished {
            // Nobody consumed the finish: start the next lap.
            self.rewind();
        }

        let step = tick * speed;
        if !(step > 0.0) {
            return false;
        }

        let seg = self.current_segment();
        if self.segment_distance + step <= seg.distance() {
            let fresh = self.segment_distance == 0.0;
            self.add_distance(step);
            let along = if fresh {
                FIRST_STEP_METERS.min(seg.distance())
            } else {
                self.segment_distance
            };
            self.point = seg.point_at(along);
        } else {
            self.add_distance(seg.distance() - self.segment_distance);
            self.point = seg.end();
            self.next_segment();
        }
        self.update_elevation();
        true
    }

    /// `true` exactly once after the cursor reached the end of the last route.
    /// Consuming the finish rewinds the cursor to the start of the first route.
    pub fn is_finish(&mut self) -> bool {
        if self.phase != NavPhase::JustFinished {
            return false;
        }
        self.rewind();
        true
    }

    /// Start an offline excursion of a random length within the configured
    /// range.  No-op when offline excursions are disabled.
    pub fn to_offline(&mut self) {
        if self.config.skip_offline || self.routes.is_empty() {
            return;
        }
        self.offline_index = self.rng.gen_range(self.config.offline_min..=self.config.offline_max);
        log::debug!("navigator offline for {} ticks at {}", self.offline_index, self.point);
    }

    /// Jump to the absolute distance `meters` from the start of the first
    /// route (clamped to the total).  Requests below one metre are rejected.
    pub fn destination_to(&mut self, meters: f64) -> bool {
        if self.routes.is_empty() || !(meters >= 1.0) {
            return false;
        }
        let target = meters.min(self.total_distance);
        match self.locate(target) {
            Some(c) => self.place(c),
            // Rounding left the target just past the summed lengths.
            None => self.place_at_end(),
        }
        true
    }

    // ── Structure ─────────────────────────────────────────────────────────

    /// Append a route.  The cursor is rewound since the path set changed.
    pub fn add_route(&mut self, route: Route) -> NavResult<()> {
        if route.is_empty() {
            return Err(NavError::EmptyRoute(route.id()));
        }
        self.routes.push(route);
        self.structure_changed();
        Ok(())
    }

    /// Remove the route with `id`.  Returns `false` when no such route exists.
    pub fn remove_route(&mut self, id: RouteId) -> bool {
        let Some(pos) = self.routes.iter().position(|r| r.id() == id) else {
            return false;
        };
        self.routes.remove(pos);
        self.structure_changed();
        true
    }

    /// Back to the start of the first route, online, with no pending finish.
    pub fn reset(&mut self) {
        self.offline_index = 0;
        self.rewind();
    }

    /// Regenerate the elevation curve.
    pub fn shuffle(&mut self) {
        self.elevation.shuffle(&mut self.rng);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn current_point(&self) -> Point {
        self.point
    }

    /// Bearing of the current segment, degrees in [0, 360).
    #[inline]
    pub fn bearing(&self) -> f64 {
        self.current_segment().bearing()
    }

    #[inline]
    pub fn elevation(&self) -> f64 {
        self.elevation.value_y()
    }

    pub fn elevation_sensor(&self) -> &Sensor {
        &self.elevation
    }

    #[inline]
    pub fn is_offline(&self) -> bool {
        self.offline_index > 0
    }

    /// Remaining offline ticks.
    #[inline]
    pub fn offline_remaining(&self) -> u32 {
        self.offline_index
    }

    #[inline]
    pub fn phase(&self) -> NavPhase {
        self.phase
    }

    #[inline]
    pub fn route_index(&self) -> usize {
        self.route_index
    }

    #[inline]
    pub fn track_index(&self) -> usize {
        self.track_index
    }

    #[inline]
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    #[inline]
    pub fn segment_distance(&self) -> f64 {
        self.segment_distance
    }

    #[inline]
    pub fn track_distance(&self) -> f64 {
        self.track_distance
    }

    #[inline]
    pub fn route_distance(&self) -> f64 {
        self.route_distance
    }

    #[inline]
    pub fn current_distance(&self) -> f64 {
        self.current_distance
    }

    /// Sum of every route's length.
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Fraction of the total path covered, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_distance > 0.0 {
            (self.current_distance / self.total_distance).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Bumped on every structural change (route added or removed).
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.routes.get(self.route_index)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_route()?.track(self.track_index)
    }

    /// The segment under the cursor, or the empty sentinel when idle.
    pub fn current_segment(&self) -> Segment {
        self.current_track()
            .and_then(|t| t.segment(self.segment_index))
            .copied()
            .unwrap_or_default()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn add_distance(&mut self, meters: f64) {
        self.segment_distance += meters;
        self.track_distance += meters;
        self.route_distance += meters;
        self.current_distance += meters;
    }

    /// Step past the end of the current segment.  Counters already include
    /// the finished segment.
    fn next_segment(&mut self) {
        let (ri, ti, si) = (self.route_index, self.track_index, self.segment_index);
        let route = &self.routes[ri];
        let track = &route.tracks()[ti];

        if let Some(next) = track.segment(si + 1).copied() {
            self.segment_index = si + 1;
            self.segment_distance = 0.0;
            if !next.continues_previous() {
                self.point = next.start();
                self.to_offline();
            }
            return;
        }

        if let Some(next) = route.track(ti + 1) {
            let connected = track.connects_to(next);
            self.point = next.first_point();
            self.track_index = ti + 1;
            self.segment_index = 0;
            self.segment_distance = 0.0;
            self.track_distance = 0.0;
            if !connected {
                self.to_offline();
            }
            return;
        }

        if let Some(next) = self.routes.get(ri + 1) {
            let connected = next.track(0).is_some_and(|first| track.connects_to(first));
            self.point = next.tracks()[0].first_point();
            self.route_index = ri + 1;
            self.track_index = 0;
            self.segment_index = 0;
            self.segment_distance = 0.0;
            self.track_distance = 0.0;
            self.route_distance = 0.0;
            if !connected {
                self.to_offline();
            }
            return;
        }

        // End of the last route: stay on its final point until the finish is
        // consumed.
        self.phase = NavPhase::JustFinished;
    }

    /// Walk route, track and segment lengths until `target` falls inside one.
    fn locate(&self, target: f64) -> Option<Cursor> {
        let mut before_route = 0.0;
        for (ri, route) in self.routes.iter().enumerate() {
            if before_route + route.distance() < target {
                before_route += route.distance();
                continue;
            }
            let mut before_track = 0.0;
            for (ti, track) in route.tracks().iter().enumerate() {
                if before_route + before_track + track.distance() < target {
                    before_track += track.distance();
                    continue;
                }
                let mut before_seg = 0.0;
                for (si, seg) in track.segments().iter().enumerate() {
                    let start = before_route + before_track + before_seg;
                    if start + seg.distance() >= target {
                        return Some(Cursor {
                            route: ri,
                            track: ti,
                            segment: si,
                            before_route,
                            before_track,
                            before_seg,
                            along: (target - start).clamp(0.0, seg.distance()),
                        });
                    }
                    before_seg += seg.distance();
                }
            }
        }
        None
    }

    fn place(&mut self, c: Cursor) {
        let seg = self.routes[c.route].tracks()[c.track].segments()[c.segment];
        self.route_index = c.route;
        self.track_index = c.track;
        self.segment_index = c.segment;
        self.segment_distance = c.along;
        self.track_distance = c.before_seg + c.along;
        self.route_distance = c.before_track + c.before_seg + c.along;
        self.current_distance = c.before_route + c.before_track + c.before_seg + c.along;
        self.point = seg.point_at(c.along);
        self.phase = NavPhase::OnPath;
        self.update_elevation();
    }

    fn place_at_end(&mut self) {
        let ri = self.routes.len() - 1;
        let route = &self.routes[ri];
        let ti = route.num_tracks() - 1;
        let track = &route.tracks()[ti];
        let si = track.num_segments() - 1;

        let seg_len = track.segments()[si].distance();
        let cursor = Cursor {
            route: ri,
            track: ti,
            segment: si,
            before_route: self.total_distance - route.distance(),
            before_track: route.distance() - track.distance(),
            before_seg: track.distance() - seg_len,
            along: seg_len,
        };
        self.place(cursor);
    }

    fn rewind(&mut self) {
        self.route_index = 0;
        self.track_index = 0;
        self.segment_index = 0;
        self.segment_distance = 0.0;
        self.track_distance = 0.0;
        self.route_distance = 0.0;
        self.current_distance = 0.0;
        self.phase = NavPhase::OnPath;
        self.point = self
            .routes
            .first()
            .and_then(|r| r.track(0))
            .map(Track::first_point)
            .unwrap_or_default();
        self.update_elevation();
    }

    fn structure_changed(&mut self) {
        self.total_distance = self.sum_distance();
        self.version += 1;
        self.offline_index = 0;
        self.rewind();
    }

    fn sum_distance(&self) -> f64 {
        self.routes.iter().map(Route::distance).sum()
    }

    fn update_elevation(&mut self) {
        let t = self.progress();
        self.elevation.next(t);
    }
}

impl Snapshot for Navigator {
    fn validate(&self) -> CoreResult<()> {
        let bad = |msg: String| Err(CoreError::Snapshot(msg));

        if self.config.validate().is_err() {
            return bad(format!(
                "navigator offline range [{}, {}] is invalid",
                self.config.offline_min, self.config.offline_max
            ));
        }
        for route in &self.routes {
            route.validate()?;
            if route.is_empty() {
                return bad(format!("route {} has no tracks", route.id()));
            }
        }
        self.elevation.validate()?;

        if self.routes.is_empty() {
            if self.route_index + self.track_index + self.segment_index != 0 {
                return bad("idle navigator with a non-zero cursor".into());
            }
            return Ok(());
        }
        let Some(track) = self.current_track() else {
            return bad(format!(
                "cursor ({}, {}) outside the route set",
                self.route_index, self.track_index
            ));
        };
        let Some(seg) = track.segment(self.segment_index) else {
            return bad(format!("segment index {} outside track {}", self.segment_index, track.id()));
        };
        if self.segment_distance < 0.0 || self.segment_distance > seg.distance() + 1e-6 {
            return bad(format!(
                "segment distance {} outside [0, {}]",
                self.segment_distance,
                seg.distance()
            ));
        }
        if self.offline_index > self.config.offline_max {
            return bad(format!("offline countdown {} exceeds its range", self.offline_index));
        }
        Ok(())
    }
}
