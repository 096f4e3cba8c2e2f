//! Projection configuration and startup parameters
//!
//! The engine reads a single option, `projection.round`: the step in degrees
//! that up-vectors are snapped to when a projection is built with rounding
//! enabled. Zero (the default) disables snapping. Configuration is stored as
//! JSON:
//!
//! ```json
//! { "projection": { "round": 0.5 } }
//! ```
//!
//! Startup centers supplied by the user are validated here; projection
//! constructors themselves never clamp their input.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ProjectionError, Result};

/// Options that shape how projections are constructed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Snapping step for up-vectors in degrees, 0 for no rounding
    #[serde(default)]
    pub round: f64,
}

/// On-disk layout: options live under the `projection` key
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    projection: ProjectionConfig,
}

impl ProjectionConfig {
    /// Configuration with the given rounding step
    pub fn with_round(round: f64) -> Result<Self> {
        let config = ProjectionConfig { round };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration document
    ///
    /// A document without a `projection` section yields the default
    /// configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        file.projection.validate()?;
        Ok(file.projection)
    }

    /// Load a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize back to the JSON document layout
    pub fn to_json_string(&self) -> Result<String> {
        let file = ConfigFile { projection: *self };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Check that the rounding step is usable
    pub fn validate(&self) -> Result<()> {
        if !self.round.is_finite() || self.round < 0.0 {
            return Err(ProjectionError::InvalidConfig(format!(
                "projection.round must be a finite, non-negative number of degrees, got {}",
                self.round
            )));
        }
        Ok(())
    }

    /// Whether up-vector snapping is active
    pub fn rounding_enabled(&self) -> bool {
        self.round != 0.0
    }

    /// Snap `value` to the nearest multiple of the rounding step
    ///
    /// Returns `value` unchanged when rounding is disabled.
    pub fn snap(&self, value: f64) -> f64 {
        if self.rounding_enabled() {
            (value / self.round).round() * self.round
        } else {
            value
        }
    }
}

/// Reject latitudes outside `[-90, 90]`
pub fn validate_latitude(lat: f64) -> Result<f64> {
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Ok(lat)
    } else {
        Err(ProjectionError::InvalidLatitude(lat))
    }
}

/// Reject longitudes that are not finite numbers
pub fn validate_longitude(lon: f64) -> Result<f64> {
    if lon.is_finite() {
        Ok(lon)
    } else {
        Err(ProjectionError::InvalidLongitude(lon))
    }
}

/// Projection center requested at startup (western-leading degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StartupCenter {
    pub lon: f64,
    pub lat: f64,
}

impl StartupCenter {
    /// Build a validated startup center
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        let center = StartupCenter { lon, lat };
        center.validate()?;
        Ok(center)
    }

    /// Parse a JSON object of the form `{"lon": .., "lat": ..}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let center: StartupCenter = serde_json::from_str(json)?;
        center.validate()?;
        Ok(center)
    }

    pub fn validate(&self) -> Result<()> {
        validate_longitude(self.lon)?;
        validate_latitude(self.lat)?;
        Ok(())
    }
}
