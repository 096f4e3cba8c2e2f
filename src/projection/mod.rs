//! Projections between spatial coordinates and the world plane
//!
//! Every projection implements [`MapProjection`], the contract consumed by
//! rendering, hit-testing and the tile cache. The two families differ in what
//! they can actually do, so the active projection is carried as the
//! [`Projection`] enum and callers branch on capability:
//!
//! - [`ObliqueCylindrical`] has an exact closed-form forward and inverse
//!   transform.
//! - [`GroundTrackProjection`] passes coordinates through unchanged and needs
//!   a [`GridInterpolator`] to recover true directions.

pub mod ground_track;
pub mod oblique;

use std::fmt;

use log::warn;

use crate::config::ProjectionConfig;
use crate::constants::{
    BUCKET_FLOOR_HEIGHT, BUCKET_HEIGHT_NUMERATOR, BUCKET_WIDTH_NUMERATOR, BUCKET_ZOOM_THRESHOLD,
};
use crate::coordinates::{SpatialPoint, WorldPoint};
use crate::grid::GridInterpolator;

pub use ground_track::GroundTrackProjection;
pub use oblique::ObliqueCylindrical;

/// Projection family, used to enforce that the active family never changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    ObliqueCylindrical,
    GroundTrack,
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionKind::ObliqueCylindrical => write!(f, "oblique cylindrical"),
            ProjectionKind::GroundTrack => write!(f, "ground track"),
        }
    }
}

/// Operations every projection provides
///
/// `ppd` arguments are pixels per degree and must be positive.
pub trait MapProjection {
    /// Family of this projection
    fn kind(&self) -> ProjectionKind;

    /// Western-leading longitude of the nominal center, if defined
    fn center_lon(&self) -> Option<f64>;

    /// Latitude of the nominal center, if defined
    fn center_lat(&self) -> Option<f64>;

    /// World-plane width of one cache bucket
    fn bucket_width(&self, ppd: f64) -> f64;

    /// World-plane height of one cache bucket
    fn bucket_height(&self, ppd: f64) -> f64;

    /// Largest world `y` covered by the cache grid
    fn upper_limit(&self) -> f64 {
        BUCKET_FLOOR_HEIGHT
    }

    /// Smallest world `y` covered by the cache grid
    fn lower_limit(&self) -> f64 {
        -BUCKET_FLOOR_HEIGHT
    }

    /// Project spatial coordinates onto the world plane
    fn spatial_to_world(&self, spatial: SpatialPoint) -> WorldPoint;

    /// Map a world-plane point back to spatial coordinates
    fn world_to_spatial(&self, world: WorldPoint) -> SpatialPoint;

    /// Legacy query-string fragment describing this projection to map servers
    fn query_fragment(&self) -> String;

    /// Center with longitude converted to east-leading, when the center is defined
    fn projection_center_east_leading(&self) -> Option<SpatialPoint> {
        match (self.center_lon(), self.center_lat()) {
            (Some(lon), Some(lat)) => {
                Some(SpatialPoint::new(SpatialPoint::new(lon, lat).lon_east_leading(), lat))
            }
            _ => None,
        }
    }
}

/// Bucket width shared by projection families: proportional to 1/ppd
pub(crate) fn proportional_bucket_width(ppd: f64) -> f64 {
    BUCKET_WIDTH_NUMERATOR / ppd
}

/// Bucket height: proportional to 1/ppd down to the zoom threshold, then a fixed floor
pub(crate) fn piecewise_bucket_height(ppd: f64) -> f64 {
    if ppd >= BUCKET_ZOOM_THRESHOLD {
        BUCKET_HEIGHT_NUMERATOR / ppd
    } else {
        BUCKET_FLOOR_HEIGHT
    }
}

/// Format a float the way Java's `Double.toString` does
///
/// Map servers parse the legacy query fragment with Java semantics, so whole
/// numbers keep a trailing `.0` and very large or small magnitudes use `E`
/// notation.
pub(crate) fn java_double_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let text = format!("{}", value);
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        let text = format!("{:E}", value);
        match text.split_once('E') {
            Some((mantissa, exponent)) if !mantissa.contains('.') => {
                format!("{}.0E{}", mantissa, exponent)
            }
            _ => text,
        }
    }
}

/// The active projection, narrowed by capability
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Closed-form, fully invertible projection
    Cylindrical(ObliqueCylindrical),
    /// Ground-track projection; true inverse needs a grid
    GroundTrack(GroundTrackProjection),
}

impl Projection {
    /// The closed-form projection, if this variant has one
    pub fn closed_form(&self) -> Option<&ObliqueCylindrical> {
        match self {
            Projection::Cylindrical(p) => Some(p),
            Projection::GroundTrack(_) => None,
        }
    }

    /// The ground-track projection, if this is one
    pub fn ground_track(&self) -> Option<&GroundTrackProjection> {
        match self {
            Projection::GroundTrack(p) => Some(p),
            Projection::Cylindrical(_) => None,
        }
    }

    /// Build a projection of the same family for a new center
    ///
    /// Ground-track projections take the new center longitude as their offset.
    pub fn recentered(&self, center: SpatialPoint, config: &ProjectionConfig) -> Projection {
        match self {
            Projection::Cylindrical(_) => Projection::Cylindrical(ObliqueCylindrical::from_center(
                center.lon,
                center.lat,
                config,
            )),
            Projection::GroundTrack(_) => {
                Projection::GroundTrack(GroundTrackProjection::new(center.lon))
            }
        }
    }

    /// Best available spatial position for a world point
    ///
    /// Closed-form projections invert exactly. Ground-track projections go
    /// through `grid`; if the lookup fails the point is reported unresolved
    /// and the world coordinates are returned unchanged.
    pub fn resolve_world_point(
        &self,
        grid: &dyn GridInterpolator,
        world: WorldPoint,
    ) -> SpatialPoint {
        match self {
            Projection::Cylindrical(p) => p.world_to_spatial(world),
            Projection::GroundTrack(p) => match p.world_to_spatial_via_grid(grid, world) {
                Ok(direction) => SpatialPoint::from_cartesian(&direction),
                Err(e) => {
                    warn!(
                        "Unresolved world point ({}, {}), leaving unchanged: {}",
                        world.x, world.y, e
                    );
                    SpatialPoint::new(world.x, world.y)
                }
            },
        }
    }
}

impl MapProjection for Projection {
    fn kind(&self) -> ProjectionKind {
        match self {
            Projection::Cylindrical(p) => p.kind(),
            Projection::GroundTrack(p) => p.kind(),
        }
    }

    fn center_lon(&self) -> Option<f64> {
        match self {
            Projection::Cylindrical(p) => p.center_lon(),
            Projection::GroundTrack(p) => p.center_lon(),
        }
    }

    fn center_lat(&self) -> Option<f64> {
        match self {
            Projection::Cylindrical(p) => p.center_lat(),
            Projection::GroundTrack(p) => p.center_lat(),
        }
    }

    fn bucket_width(&self, ppd: f64) -> f64 {
        match self {
            Projection::Cylindrical(p) => p.bucket_width(ppd),
            Projection::GroundTrack(p) => p.bucket_width(ppd),
        }
    }

    fn bucket_height(&self, ppd: f64) -> f64 {
        match self {
            Projection::Cylindrical(p) => p.bucket_height(ppd),
            Projection::GroundTrack(p) => p.bucket_height(ppd),
        }
    }

    fn upper_limit(&self) -> f64 {
        match self {
            Projection::Cylindrical(p) => p.upper_limit(),
            Projection::GroundTrack(p) => p.upper_limit(),
        }
    }

    fn lower_limit(&self) -> f64 {
        match self {
            Projection::Cylindrical(p) => p.lower_limit(),
            Projection::GroundTrack(p) => p.lower_limit(),
        }
    }

    fn spatial_to_world(&self, spatial: SpatialPoint) -> WorldPoint {
        match self {
            Projection::Cylindrical(p) => p.spatial_to_world(spatial),
            Projection::GroundTrack(p) => p.spatial_to_world(spatial),
        }
    }

    fn world_to_spatial(&self, world: WorldPoint) -> SpatialPoint {
        match self {
            Projection::Cylindrical(p) => p.world_to_spatial(world),
            Projection::GroundTrack(p) => p.world_to_spatial(world),
        }
    }

    fn query_fragment(&self) -> String {
        match self {
            Projection::Cylindrical(p) => p.query_fragment(),
            Projection::GroundTrack(p) => p.query_fragment(),
        }
    }
}

impl From<ObliqueCylindrical> for Projection {
    fn from(p: ObliqueCylindrical) -> Self {
        Projection::Cylindrical(p)
    }
}

impl From<GroundTrackProjection> for Projection {
    fn from(p: GroundTrackProjection) -> Self {
        Projection::GroundTrack(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Cartesian3;
    use crate::grid::VectorGrid;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, "90.0")]
    #[case(-45.0, "-45.0")]
    #[case(12.5, "12.5")]
    #[case(0.0, "0.0")]
    #[case(0.001, "0.001")]
    #[case(1e-4, "1.0E-4")]
    #[case(1.5e7, "1.5E7")]
    #[case(1e7, "1.0E7")]
    #[case(f64::NAN, "NaN")]
    fn test_java_double_string(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(java_double_string(value), expected);
    }

    #[test]
    fn test_capabilities() {
        let cyl: Projection = ObliqueCylindrical::from_up_exact(0.0, 90.0).into();
        assert!(cyl.closed_form().is_some());
        assert!(cyl.ground_track().is_none());
        assert_eq!(cyl.kind(), ProjectionKind::ObliqueCylindrical);

        let track: Projection = GroundTrackProjection::new(12.0).into();
        assert!(track.closed_form().is_none());
        assert!(track.ground_track().is_some());
        assert_eq!(track.kind(), ProjectionKind::GroundTrack);
    }

    #[test]
    fn test_recentered_keeps_family() {
        let config = ProjectionConfig::default();
        let cyl: Projection = ObliqueCylindrical::from_center(0.0, 0.0, &config).into();
        let moved = cyl.recentered(SpatialPoint::new(40.0, 10.0), &config);
        assert_eq!(moved.kind(), ProjectionKind::ObliqueCylindrical);
        assert_eq!(moved.center_lon(), Some(40.0));
        assert_eq!(moved.center_lat(), Some(10.0));

        let track: Projection = GroundTrackProjection::new(0.0).into();
        let moved = track.recentered(SpatialPoint::new(33.33, 10.0), &config);
        assert_eq!(moved.kind(), ProjectionKind::GroundTrack);
        assert_eq!(moved.ground_track().unwrap().offset_lon(), 33.3);
    }

    #[test]
    fn test_east_leading_center() {
        let config = ProjectionConfig::default();
        let cyl = ObliqueCylindrical::from_center(90.0, 15.0, &config);
        let east = cyl.projection_center_east_leading().unwrap();
        assert_eq!(east.lon, 270.0);
        assert_eq!(east.lat, 15.0);

        assert!(GroundTrackProjection::new(5.0)
            .projection_center_east_leading()
            .is_none());
    }

    #[test]
    fn test_resolve_world_point() {
        let grid = VectorGrid::from_fn(WorldPoint::new(0.0, 0.0), 1.0, 1.0, 4, 4, |w| {
            Cartesian3::from_lon_lat_degrees(w.x, w.y)
        })
        .unwrap();

        let track: Projection = GroundTrackProjection::new(0.0).into();
        let resolved = track.resolve_world_point(&grid, WorldPoint::new(2.0, 3.0));
        assert!((resolved.lon - 2.0).abs() < 1e-9);
        assert!((resolved.lat - 3.0).abs() < 1e-9);

        // Outside the grid the point comes back unchanged
        let unresolved = track.resolve_world_point(&grid, WorldPoint::new(50.0, -3.0));
        assert_eq!(unresolved, SpatialPoint::new(50.0, -3.0));

        // Closed-form projections ignore the grid
        let cyl: Projection = ObliqueCylindrical::from_up_exact(0.0, 90.0).into();
        let p = cyl.resolve_world_point(&grid, WorldPoint::new(50.0, -3.0));
        assert!((p.lat + 3.0).abs() < 1e-9);
    }
}
