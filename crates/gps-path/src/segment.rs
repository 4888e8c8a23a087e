//! A directed straight edge between two points.

use gps_core::Point;
use serde::{Deserialize, Serialize};

/// A directed geodesic edge with precomputed length and initial bearing.
///
/// A zero-length segment ([`is_empty`](Self::is_empty)) doubles as the
/// "no such segment" sentinel returned by lookups past the end of a path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    start:     Point,
    end:       Point,
    distance:  f64,
    bearing:   f64,
    index:     usize,
    /// `true` when `start` equals the previous segment's `end` exactly.
    continues: bool,
}

impl Segment {
    /// Build segment number `index` from `start` to `end`.
    ///
    /// The relation flag starts `false`; [`Track`](crate::Track) sets it once
    /// all segments are known.
    pub fn new(start: Point, end: Point, index: usize) -> Self {
        Self {
            start,
            end,
            distance: start.distance_to(end),
            bearing: start.bearing_to(end),
            index,
            continues: false,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distance == 0.0
    }

    /// The point `meters` along the segment, projected from `start`.
    #[inline]
    pub fn point_at(&self, meters: f64) -> Point {
        self.start.destination(meters, self.bearing)
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Length in metres.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Initial bearing in degrees, `[0, 360)`.
    #[inline]
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn continues_previous(&self) -> bool {
        self.continues
    }

    pub(crate) fn link(&mut self, previous: Option<&Segment>) {
        self.continues = previous.is_some_and(|p| p.end == self.start);
    }
}
