//! An ordered set of tracks.

use gps_core::{Color, CoreError, CoreResult, Properties, RouteId, Snapshot, TrackId};
use serde::{Deserialize, Serialize};

use crate::Track;

/// An ordered sequence of tracks with a running total distance.
///
/// Adding or removing a track bumps [`version`](Self::version).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    id:       RouteId,
    name:     String,
    color:    Option<Color>,
    props:    Properties,
    tracks:   Vec<Track>,
    distance: f64,
    version:  u64,
}

impl Route {
    /// An empty route.
    pub fn new(id: RouteId) -> Self {
        Self {
            id,
            name: String::new(),
            color: None,
            props: Properties::new(),
            tracks: Vec::new(),
            distance: 0.0,
            version: 0,
        }
    }

    pub fn from_tracks(id: RouteId, tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut route = Self::new(id);
        for track in tracks {
            route.add_track(track);
        }
        route
    }

    pub fn add_track(&mut self, track: Track) {
        self.distance += track.distance();
        self.tracks.push(track);
        self.version += 1;
    }

    /// Remove the track with `id`.  Returns `false` if there is none.
    pub fn remove_track(&mut self, id: TrackId) -> bool {
        let Some(pos) = self.tracks.iter().position(|t| t.id() == id) else {
            return false;
        };
        self.tracks.remove(pos);
        self.distance = self.tracks.iter().map(Track::distance).sum();
        self.version += 1;
        true
    }

    // ── Identity & metadata ───────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> RouteId {
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

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Tracks ────────────────────────────────────────────────────────────

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn track(&self, i: usize) -> Option<&Track> {
        self.tracks.get(i)
    }

    pub fn track_by_id(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Sum of all track distances, metres.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Snapshot for Route {
    fn validate(&self) -> CoreResult<()> {
        for track in &self.tracks {
            track.validate()?;
        }
        let sum: f64 = self.tracks.iter().map(Track::distance).sum();
        if (sum - self.distance).abs() > 1e-6 * self.distance.max(1.0) {
            return Err(CoreError::Snapshot(format!(
                "route {} distance {} does not match its tracks ({sum})",
                self.id, self.distance
            )));
        }
        Ok(())
    }
}
