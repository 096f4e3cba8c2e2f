//! Error types for the projection engine
//!
//! Rejected registry transitions, invalid startup input and configuration
//! problems all surface as [`ProjectionError`]. Grid lookups have their own
//! [`GridError`](crate::grid::GridError), which converts into this type.

use thiserror::Error;

use crate::grid::GridError;
use crate::projection::ProjectionKind;

/// Main error type for the projection engine
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// Attempt to switch the projection family of a registry at runtime
    #[error("Projection type cannot change at runtime: active is {current}, requested {requested}")]
    TypeMismatch {
        /// Kind of the active projection
        current: ProjectionKind,
        /// Kind that was offered
        requested: ProjectionKind,
    },

    /// A listener tried to publish a projection while being notified
    #[error("Projection change requested from inside a change notification")]
    ReentrantTransition,

    /// Operation needs an active projection but none has been published
    #[error("No active projection")]
    NoActiveProjection,

    /// Latitude outside [-90, 90] or not a finite number
    #[error("Invalid latitude: {0} (must lie within [-90, 90])")]
    InvalidLatitude(f64),

    /// Longitude that is not a finite number
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Grid interpolation failed
    #[error("Grid lookup failed: {0}")]
    Grid(#[from] GridError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for projection operations
pub type Result<T> = std::result::Result<T, ProjectionError>;
