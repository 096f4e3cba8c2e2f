//! Two-dimensional points on either side of a projection
//!
//! `SpatialPoint` holds western-leading longitude and ocentric latitude in
//! degrees. `WorldPoint` holds coordinates on the flattened world plane. Both
//! are plain `f64` pairs; keeping them as distinct types stops a caller from
//! feeding world coordinates where spatial ones are expected.

use crate::coordinates::cartesian::Cartesian3;

/// A point in spatial coordinates (degrees)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpatialPoint {
    /// Western-leading longitude in degrees
    pub lon: f64,
    /// Ocentric latitude in degrees north
    pub lat: f64,
}

impl SpatialPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        SpatialPoint { lon, lat }
    }

    /// Longitude converted to the east-leading convention, in `[0, 360)`
    pub fn lon_east_leading(&self) -> f64 {
        (360.0 - self.lon).rem_euclid(360.0)
    }

    /// Unit direction vector for this point
    pub fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_lon_lat_degrees(self.lon, self.lat)
    }

    /// Spatial point for a direction vector, longitude in `[0, 360)`
    pub fn from_cartesian(v: &Cartesian3) -> Self {
        SpatialPoint {
            lon: v.lon_degrees(),
            lat: v.lat_degrees(),
        }
    }
}

/// A point on the world plane
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        WorldPoint { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Smallest signed difference `a - b` between two longitudes, in `(-180, 180]`
pub fn lon_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}
