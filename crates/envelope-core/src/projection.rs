//! Spherical Web-Mercator projection between geographic degrees and planar metres.
//! All coordinate math uses f64 for precision.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Spherical earth radius used by tile-map Web Mercator (EPSG:3857), metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the square Web-Mercator world ends, degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// A point in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_meters(self) -> PlanarPoint {
        to_meters(self.lat, self.lon)
    }
}

/// A point on the Web-Mercator plane, metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross).
    pub fn perp_dot(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Counter-clockwise perpendicular, `(-y, x)`.
    pub fn perp(self) -> Self {
        Self { x: -self.y, y: self.x }
    }

    pub fn to_geo(self) -> GeoPoint {
        to_lat_lng(self.x, self.y)
    }
}

impl Add for PlanarPoint {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for PlanarPoint {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f64> for PlanarPoint {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self { x: self.x * s, y: self.y * s }
    }
}

impl Neg for PlanarPoint {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

/// Forward projection: degrees → Web-Mercator metres.
///
/// No range validation. At lat = ±90° the result is infinite, matching
/// tile-map convention.
pub fn to_meters(lat: f64, lon: f64) -> PlanarPoint {
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    PlanarPoint { x, y }
}

/// Inverse projection: Web-Mercator metres → degrees. Exact inverse of [`to_meters`].
pub fn to_lat_lng(x: f64, y: f64) -> GeoPoint {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees();
    GeoPoint { lat, lon }
}
