//! An ordered run of segments built from a polyline.

use gps_core::{Color, CoreError, CoreResult, Point, Properties, Snapshot, TrackId};
use serde::{Deserialize, Serialize};

use crate::{PathError, PathResult, Segment};

/// An ordered sequence of segments plus identity and metadata.
///
/// The segment list is fixed at construction.  Metadata setters bump
/// [`version`](Self::version) so caches built on top can detect changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    id:       TrackId,
    name:     String,
    color:    Option<Color>,
    props:    Properties,
    segments: Vec<Segment>,
    distance: f64,
    closed:   bool,
    version:  u64,
}

impl Track {
    /// Build a track from at least two points.
    ///
    /// The track is *closed* when it has three or more points and the first
    /// and last coincide exactly (a polygon ring).
    pub fn new(id: TrackId, points: &[Point]) -> PathResult<Self> {
        Self::from_polylines(id, &[points])
    }

    /// Build one track from several polylines laid end to end, each with at
    /// least two points.
    ///
    /// Where a part does not start on the previous part's last point the
    /// joining segment is marked as not continuing, and a navigator crossing
    /// it jumps to the new part and goes offline.
    pub fn from_polylines(id: TrackId, parts: &[&[Point]]) -> PathResult<Self> {
        if parts.is_empty() {
            return Err(PathError::InvalidPath(0));
        }

        let mut segments: Vec<Segment> = Vec::new();
        for part in parts {
            if part.len() < 2 {
                return Err(PathError::InvalidPath(part.len()));
            }
            let base = segments.len();
            segments.extend(part.windows(2).enumerate().map(|(i, w)| Segment::new(w[0], w[1], base + i)));
        }
        for i in 0..segments.len() {
            let (head, tail) = segments.split_at_mut(i);
            tail[0].link(head.last());
        }

        let distance = segments.iter().map(Segment::distance).sum();
        let num_points: usize = parts.iter().map(|p| p.len()).sum();
        let closed = num_points >= 3 && segments[0].start() == segments[segments.len() - 1].end();

        Ok(Self {
            id,
            name: String::new(),
            color: None,
            props: Properties::new(),
            segments,
            distance,
            closed,
            version: 0,
        })
    }

    // ── Identity & metadata ───────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.version += 1;
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
        self.version += 1;
    }

    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub fn set_props(&mut self, props: Properties) {
        self.props = props;
        self.version += 1;
    }

    pub fn insert_prop(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.props.insert(key.into(), value.into());
        self.version += 1;
    }

    /// Monotonic mutation counter.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Total length in metres.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Segment `i`, or `None` past the end.
    #[inline]
    pub fn segment(&self, i: usize) -> Option<&Segment> {
        self.segments.get(i)
    }

    pub fn first_point(&self) -> Point {
        self.segments[0].start()
    }

    pub fn last_point(&self) -> Point {
        self.segments[self.segments.len() - 1].end()
    }

    /// Rebuild the points the track was created from, all parts flattened
    /// in order.
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        for seg in &self.segments {
            if !seg.continues_previous() {
                points.push(seg.start());
            }
            points.push(seg.end());
        }
        points
    }

    /// Number of polylines the track was built from.
    pub fn num_parts(&self) -> usize {
        self.segments.iter().filter(|s| !s.continues_previous()).count()
    }

    /// `true` when `next` starts exactly where this track ends.
    #[inline]
    pub fn connects_to(&self, next: &Track) -> bool {
        self.last_point() == next.first_point()
    }
}

impl Snapshot for Track {
    fn validate(&self) -> CoreResult<()> {
        if self.segments.is_empty() {
            return Err(CoreError::Snapshot(format!("track {} has no segments", self.id)));
        }
        let sum: f64 = self.segments.iter().map(Segment::distance).sum();
        if self.distance < 0.0 || (sum - self.distance).abs() > 1e-6 * self.distance.max(1.0) {
            return Err(CoreError::Snapshot(format!(
                "track {} distance {} does not match its segments ({sum})",
                self.id, self.distance
            )));
        }
        Ok(())
    }
}
