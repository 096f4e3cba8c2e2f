//! # Cartesian Direction Module
//!
//! This module provides the 3D Cartesian vector that every projection in the
//! crate is built on. Spatial coordinates are converted to directions on the
//! unit sphere, manipulated with dot/cross/rotate operations, and converted
//! back.
//!
//! ## Coordinate System Convention
//!
//! Longitudes are **western-leading** (they increase toward the west), so the
//! sphere construction negates longitude:
//!
//! - **X-axis**: Points toward lon = 0°, lat = 0°
//! - **Y-axis**: Points toward lon = 270° W (90° E), lat = 0°
//! - **Z-axis**: Points toward the north pole (lat = +90°)
//!
//! ```text
//! v = (cos(lat)·cos(−lon), cos(lat)·sin(−lon), sin(lat))
//! ```
//!
//! ## Numerical Stability
//!
//! Angles between directions are measured with `atan2(|a×b|, a·b)` rather than
//! `acos(a·b)`. The arccosine form loses nearly all precision when the vectors
//! are almost parallel or anti-parallel, and its `asin` cousin can produce NaN
//! once rounding error pushes the argument past ±1.
//!
//! ## Examples
//!
//! ```rust
//! use planetproj::coordinates::cartesian::Cartesian3;
//!
//! let origin = Cartesian3::from_lon_lat_degrees(0.0, 0.0);
//! let north_pole = Cartesian3::new(0.0, 0.0, 1.0);
//!
//! let angle = origin.separation(&north_pole);
//! assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
//! ```

use nalgebra::{Rotation3, Unit, Vector3};
use std::f64::consts::PI;

use crate::constants::{DEG2RAD, RAD2DEG, TAU};

/// Three-dimensional Cartesian vector
///
/// Represents a direction (or, for intermediate results, an arbitrary vector)
/// in the body-fixed frame. Components are stored exactly as given; nothing is
/// normalized implicitly. Angular accessors normalize internally.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cartesian3 {
    /// X-component (toward lon 0°, lat 0°)
    pub x: f64,
    /// Y-component (toward lon 270° W)
    pub y: f64,
    /// Z-component (toward the north pole)
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new Cartesian vector
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planetproj::coordinates::cartesian::Cartesian3;
    ///
    /// let v = Cartesian3::new(1.0, 0.0, 0.0);
    /// assert_eq!(v.x, 1.0);
    /// ```
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Creates a unit vector from western-leading longitude and latitude in radians
    ///
    /// # Mathematical Conversion
    ///
    /// - `x = cos(lat) * cos(-lon)`
    /// - `y = cos(lat) * sin(-lon)`
    /// - `z = sin(lat)`
    pub fn from_lon_lat_radians(lon: f64, lat: f64) -> Self {
        let cos_lat = lat.cos();
        Cartesian3 {
            x: cos_lat * (-lon).cos(),
            y: cos_lat * (-lon).sin(),
            z: lat.sin(),
        }
    }

    /// Creates a unit vector from western-leading longitude and latitude in degrees
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planetproj::coordinates::cartesian::Cartesian3;
    ///
    /// // 90° W sits on the negative Y axis
    /// let v = Cartesian3::from_lon_lat_degrees(90.0, 0.0);
    /// assert!(v.x.abs() < 1e-15);
    /// assert!((v.y + 1.0).abs() < 1e-15);
    /// ```
    pub fn from_lon_lat_degrees(lon: f64, lat: f64) -> Self {
        Self::from_lon_lat_radians(lon * DEG2RAD, lat * DEG2RAD)
    }

    /// Euclidean length of the vector
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planetproj::coordinates::cartesian::Cartesian3;
    ///
    /// assert_eq!(Cartesian3::new(3.0, 4.0, 0.0).norm(), 5.0);
    /// ```
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the unit vector in the same direction
    ///
    /// Returns `None` for the zero vector (or any vector whose length is not a
    /// positive finite number), since it has no direction.
    pub fn unit(&self) -> Option<Cartesian3> {
        let mag = self.norm();
        if mag == 0.0 || !mag.is_finite() {
            None
        } else {
            Some(*self / mag)
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    ///
    /// ```text
    /// cross = (y₁*z₂ - z₁*y₂, z₁*x₂ - x₁*z₂, x₁*y₂ - y₁*x₂)
    /// ```
    pub fn cross(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Multiplies every component by `factor`
    pub fn scale(&self, factor: f64) -> Cartesian3 {
        *self * factor
    }

    /// Returns the antipodal vector
    pub fn negate(&self) -> Cartesian3 {
        -*self
    }

    /// Rotates this vector around `axis` by `angle` radians
    ///
    /// Positive angles follow the right-hand rule about `axis`. The axis does
    /// not need to be normalized. A zero-length axis defines no rotation, so
    /// the vector is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planetproj::coordinates::cartesian::Cartesian3;
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let z_axis = Cartesian3::new(0.0, 0.0, 1.0);
    /// let rotated = x_axis.rotate(&z_axis, FRAC_PI_2);
    /// assert!(rotated.x.abs() < 1e-15);
    /// assert!((rotated.y - 1.0).abs() < 1e-15);
    /// ```
    pub fn rotate(&self, axis: &Cartesian3, angle: f64) -> Cartesian3 {
        match Unit::try_new(axis.to_vector3(), 0.0) {
            Some(unit_axis) => {
                let rotation = Rotation3::from_axis_angle(&unit_axis, angle);
                Cartesian3::from_vector3(rotation * self.to_vector3())
            }
            None => *self,
        }
    }

    /// Angle between two vectors in radians, in `[0, π]`
    ///
    /// Computed as `atan2(|a×b|, a·b)`, which stays accurate for nearly
    /// parallel and nearly antipodal vectors. Neither vector needs to be
    /// normalized.
    pub fn separation(&self, other: &Cartesian3) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }

    /// Western-leading longitude in radians, in `[0, 2π)`
    ///
    /// The branches are:
    /// - `y > 0`: `2π − atan2(y, x)`
    /// - `y < 0`: `−atan2(y, x)`
    /// - `y == 0`, `x < 0`: `π`
    /// - otherwise `0`
    pub fn lon_radians(&self) -> f64 {
        if self.y > 0.0 {
            TAU - self.y.atan2(self.x)
        } else if self.y < 0.0 {
            -self.y.atan2(self.x)
        } else if self.x < 0.0 {
            PI
        } else {
            0.0
        }
    }

    /// Latitude in radians, in `[-π/2, π/2]`
    ///
    /// The zero vector has latitude 0.
    pub fn lat_radians(&self) -> f64 {
        match self.unit() {
            // Clamp guards against |z| creeping past 1 after normalization
            Some(u) => u.z.clamp(-1.0, 1.0).asin(),
            None => 0.0,
        }
    }

    /// Western-leading longitude in degrees, in `[0, 360)`
    pub fn lon_degrees(&self) -> f64 {
        self.lon_radians() * RAD2DEG
    }

    /// Latitude in degrees
    pub fn lat_degrees(&self) -> f64 {
        self.lat_radians() * RAD2DEG
    }

    /// Converts to nalgebra Vector3 for linear algebra operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from nalgebra Vector3
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }

    /// True when every component is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Cartesian3 {
    type Output = Cartesian3;

    fn add(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Cartesian3 {
    type Output = Cartesian3;

    fn sub(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn mul(self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl std::ops::Div<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn div(self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl std::ops::Neg for Cartesian3 {
    type Output = Cartesian3;

    fn neg(self) -> Cartesian3 {
        Cartesian3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
