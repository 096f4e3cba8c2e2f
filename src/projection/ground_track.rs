//! Ground-track projection
//!
//! A projection referenced to a spacecraft ground track rather than a fixed
//! up direction. It carries only the western-leading longitude offset of the
//! track reference.
//!
//! The direct transforms are identity pass-throughs. Whether that is a
//! deliberate "not applicable" stub or a latent defect is unknown, so the
//! behaviour is kept as-is: code that needs the real direction for a world
//! point must use [`GroundTrackProjection::world_to_spatial_via_grid`] with a
//! grid supplied by the ephemeris layer.

use log::{debug, trace};

use super::{piecewise_bucket_height, proportional_bucket_width, MapProjection, ProjectionKind};
use crate::constants::{BUCKET_FLOOR_HEIGHT, BUCKET_ZOOM_THRESHOLD, GROUND_TRACK_STEPS_PER_DEG};
use crate::coordinates::{Cartesian3, SpatialPoint, WorldPoint};
use crate::grid::{GridError, GridInterpolator};

/// Projection referenced to a moving ground track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTrackProjection {
    offset_lon: f64,
}

/// Round up to an integer, then up again to the next even integer if odd
fn even_ceiling(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let mut i_val = value.ceil() as i64;
    if i_val % 2 != 0 {
        i_val += 1;
    }
    i_val as f64
}

impl GroundTrackProjection {
    /// Build from the track reference longitude, rounded to the nearest 0.1°
    pub fn new(start: f64) -> Self {
        let offset_lon = (start * GROUND_TRACK_STEPS_PER_DEG).round() / GROUND_TRACK_STEPS_PER_DEG;
        debug!("Ground-track projection with offset {}", offset_lon);
        GroundTrackProjection { offset_lon }
    }

    /// Western-leading longitude offset of the ground-track reference
    pub fn offset_lon(&self) -> f64 {
        self.offset_lon
    }

    /// True direction for a world point, interpolated from `grid`
    ///
    /// Fails with the grid's error when the point is outside the grid or the
    /// cell is degenerate; callers should then treat the point as unresolved.
    pub fn world_to_spatial_via_grid(
        &self,
        grid: &dyn GridInterpolator,
        world: WorldPoint,
    ) -> Result<Cartesian3, GridError> {
        let cell = grid.cell_at(world)?;
        trace!(
            "Interpolating ({}, {}) at offset ({}, {})",
            world.x,
            world.y,
            cell.u,
            cell.v
        );
        cell.interpolate()
    }
}

impl MapProjection for GroundTrackProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::GroundTrack
    }

    fn center_lon(&self) -> Option<f64> {
        None
    }

    fn center_lat(&self) -> Option<f64> {
        None
    }

    fn bucket_width(&self, ppd: f64) -> f64 {
        even_ceiling(proportional_bucket_width(ppd))
    }

    fn bucket_height(&self, ppd: f64) -> f64 {
        if ppd >= BUCKET_ZOOM_THRESHOLD {
            even_ceiling(piecewise_bucket_height(ppd))
        } else {
            BUCKET_FLOOR_HEIGHT
        }
    }

    fn spatial_to_world(&self, spatial: SpatialPoint) -> WorldPoint {
        WorldPoint::new(spatial.lon, spatial.lat)
    }

    fn world_to_spatial(&self, world: WorldPoint) -> SpatialPoint {
        SpatialPoint::new(world.x, world.y)
    }

    fn query_fragment(&self) -> String {
        "&TRACK_format=c".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VectorGrid;
    use rstest::rstest;

    #[rstest]
    #[case(12.34, 12.3)]
    #[case(12.36, 12.4)]
    #[case(-0.04, 0.0)]
    #[case(359.96, 360.0)]
    #[case(45.0, 45.0)]
    fn test_offset_rounding(#[case] start: f64, #[case] expected: f64) {
        assert_eq!(GroundTrackProjection::new(start).offset_lon(), expected);
    }

    #[rstest]
    #[case(8.0, 46.0)]
    #[case(16.0, 24.0)]
    #[case(1.0, 360.0)]
    #[case(7.0, 52.0)]
    #[case(1000.0, 2.0)]
    fn test_bucket_width_is_even(#[case] ppd: f64, #[case] expected: f64) {
        let proj = GroundTrackProjection::new(0.0);
        let width = proj.bucket_width(ppd);
        assert_eq!(width, expected);
        assert_eq!(width as i64 % 2, 0);
    }

    #[test]
    fn test_bucket_height() {
        let proj = GroundTrackProjection::new(0.0);
        assert_eq!(proj.bucket_height(2.0), 88.0);
        assert_eq!(proj.bucket_height(4.0), 88.0);
        // 352 / 5 = 70.4 -> 71 -> 72
        assert_eq!(proj.bucket_height(5.0), 72.0);
        assert_eq!(proj.upper_limit(), 88.0);
        assert_eq!(proj.lower_limit(), -88.0);
    }

    #[test]
    fn test_identity_transforms() {
        let proj = GroundTrackProjection::new(10.0);
        let w = proj.spatial_to_world(SpatialPoint::new(123.4, -5.6));
        assert_eq!(w, WorldPoint::new(123.4, -5.6));
        let s = proj.world_to_spatial(WorldPoint::new(-7.0, 99.0));
        assert_eq!(s, SpatialPoint::new(-7.0, 99.0));
    }

    #[test]
    fn test_center_is_undefined() {
        let proj = GroundTrackProjection::new(10.0);
        assert_eq!(proj.center_lon(), None);
        assert_eq!(proj.center_lat(), None);
        assert_eq!(proj.query_fragment(), "&TRACK_format=c");
    }

    #[test]
    fn test_grid_lookup_failure() {
        let grid = VectorGrid::from_fn(WorldPoint::new(0.0, 0.0), 1.0, 1.0, 2, 2, |w| {
            Cartesian3::from_lon_lat_degrees(w.x, w.y)
        })
        .unwrap();
        let proj = GroundTrackProjection::new(0.0);

        let ok = proj
            .world_to_spatial_via_grid(&grid, WorldPoint::new(0.5, 0.5))
            .unwrap();
        assert!(ok.is_finite());

        let err = proj.world_to_spatial_via_grid(&grid, WorldPoint::new(5.0, 0.5));
        assert!(matches!(err, Err(GridError::CellNotFound { .. })));
    }
}
