//! Constants module for projection calculations

use std::f64::consts::PI;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;
/// Degrees in a full circle
pub const FULL_CIRCLE_DEG: f64 = 360.0;

// Tile bucket metrics. These thresholds size the external cache grid, so
// changing them changes cache fan-out.
/// Horizontal bucket extent numerator (degrees times pixels-per-degree)
pub const BUCKET_WIDTH_NUMERATOR: f64 = 360.0;
/// Vertical bucket extent numerator used at and above `BUCKET_ZOOM_THRESHOLD`
pub const BUCKET_HEIGHT_NUMERATOR: f64 = 352.0;
/// Floor bucket height at low zoom, also the world-plane latitude limit
pub const BUCKET_FLOOR_HEIGHT: f64 = 88.0;
/// Pixels-per-degree at which bucket height switches to the proportional regime
pub const BUCKET_ZOOM_THRESHOLD: f64 = 4.0;

// Canonicalization
/// Distance from a pole (degrees) inside which the up longitude is forced to zero
pub const POLE_SNAP_TOLERANCE_DEG: f64 = 0.001;
/// Ground-track offsets are rounded to 1/10 of a degree
pub const GROUND_TRACK_STEPS_PER_DEG: f64 = 10.0;

/// Placeholder sent for the center fields of the legacy track query fragment
pub const LEGACY_CENTER_PLACEHOLDER: &str = "888";
