//! Geographic primitives: coordinates and great-circle distance.
//!
//! Distances use the haversine formula on a spherical Earth of mean radius
//! 3958.8 miles. Typical error against the WGS-84 ellipsoid is around 0.5%,
//! fine for a city-radius search but not for surveying.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::location::types::LocatorError;

const DEG: f64 = PI / 180.0;

/// Earth's mean radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A latitude/longitude pair in decimal degrees.
///
/// Deserialization goes through [`GeoPoint::new`], so out-of-range JSON is
/// rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = LocatorError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Validated constructor. Latitude must lie in [-90, 90] and longitude
    /// in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocatorError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(LocatorError::InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Unchecked constructor for compile-time reference data.
    pub const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in miles.
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        haversine_miles(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// Haversine distance between two points, in miles.
///
/// Treats the Earth as a perfect sphere (see module docs for the error bound).
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude * DEG;
    let lat2 = b.latitude * DEG;
    let dlat = (b.latitude - a.latitude) * DEG;
    let dlon = (b.longitude - a.longitude) * DEG;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}
