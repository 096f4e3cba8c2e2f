//! Planetproj: invertible cartographic projections for planetary bodies
//!
//! This crate maps between spatial coordinates (western-leading longitude and
//! ocentric latitude on a body's reference sphere) and a flattened world plane
//! used for screen rendering, tile addressing and feature geometry.
//!
//! - [`coordinates`]: the unit-sphere vector and point types
//! - [`projection`]: the projection contract and its two families
//! - [`grid`]: the grid-interpolation boundary used by ground-track projections
//! - [`registry`]: the holder of the active projection and its listeners
//! - [`config`]: the `projection.round` option and startup validation
//!
//! # Example
//!
//! ```rust
//! use planetproj::{MapProjection, ObliqueCylindrical, ProjectionConfig, SpatialPoint};
//!
//! let proj = ObliqueCylindrical::from_center(0.0, 0.0, &ProjectionConfig::default());
//! let world = proj.spatial_to_world(SpatialPoint::new(90.0, 0.0));
//! assert!((world.x - 270.0).abs() < 1e-9);
//!
//! let back = proj.world_to_spatial(world);
//! assert!((back.lon - 90.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod constants;
pub mod coordinates;
pub mod errors;
pub mod grid;
pub mod projection;
pub mod registry;

// Re-export commonly used types
pub use config::{ProjectionConfig, StartupCenter};
pub use coordinates::{Cartesian3, SpatialPoint, WorldPoint};
pub use errors::{ProjectionError, Result};
pub use grid::{GridCell, GridError, GridInterpolator, VectorGrid};
pub use projection::{
    GroundTrackProjection, MapProjection, ObliqueCylindrical, Projection, ProjectionKind,
};
pub use registry::{ListenerId, ProjectionListener, ProjectionRegistry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_default_projection() {
        let config = ProjectionConfig::default();
        let registry = ProjectionRegistry::new();
        registry
            .set_projection(ObliqueCylindrical::from_center(0.0, 0.0, &config).into())
            .unwrap();

        let active = registry.current().unwrap();
        let world = active.spatial_to_world(SpatialPoint::new(45.0, 10.0));
        let back = active.world_to_spatial(world);
        assert!((back.lon - 45.0).abs() < 1e-9);
        assert!((back.lat - 10.0).abs() < 1e-9);
    }
}
