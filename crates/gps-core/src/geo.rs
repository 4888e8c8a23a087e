//! Geographic coordinate type and great-circle utilities.
//!
//! All functions work on a spherical Earth of radius [`EARTH_RADIUS_M`].
//! Angles are degrees at the API boundary and radians internally.  Inputs are
//! not validated: antipodal or out-of-range coordinates produce
//! mathematically valid but physically meaningless results.

use serde::{Deserialize, Serialize};

/// Mean Earth radius, metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in double precision.
///
/// Equality is exact floating-point equality.  The path model relies on this
/// to decide whether two segments or tracks are physically connected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to `other` in metres.
    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        distance(self.lat, self.lon, other.lat, other.lon)
    }

    /// Initial bearing towards `other` in degrees, `[0, 360)`.
    #[inline]
    pub fn bearing_to(self, other: Point) -> f64 {
        bearing(self.lat, self.lon, other.lat, other.lon)
    }

    /// The point reached by travelling `meters` from `self` along `bearing_deg`.
    #[inline]
    pub fn destination(self, meters: f64, bearing_deg: f64) -> Point {
        destination(self.lat, self.lon, meters, bearing_deg)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance in metres.
pub fn distance(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let lat1 = lat_a.to_radians();
    let lat2 = lat_b.to_radians();

    let a = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from A to B in degrees, normalised to `[0, 360)`.
pub fn bearing(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let lat1 = lat_a.to_radians();
    let lat2 = lat_b.to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Project a point `meters` forward from `(lat, lon)` along `bearing_deg`
/// (direct geodesic problem on a sphere).
///
/// The resulting longitude is wrapped into `[-180, 180)`.
pub fn destination(lat: f64, lon: f64, meters: f64, bearing_deg: f64) -> Point {
    let delta = meters / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Point {
        lat: lat2.to_degrees(),
        lon: (lon2.to_degrees() + 540.0) % 360.0 - 180.0,
    }
}
