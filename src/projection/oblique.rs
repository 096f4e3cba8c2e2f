//! # Oblique Cylindrical Projection
//!
//! The default projection. It is a cylindrical projection whose axis is an
//! arbitrary "up" direction instead of the body's spin axis:
//!
//! - world `y` is the angular distance from the great circle 90° away from
//!   `up` (the projection's equator), positive toward `up`
//! - world `x` is the angle around `up`, measured from the `center` meridian
//!
//! With `up` at the north pole this reduces to a plain cylindrical map whose
//! `x` grows eastward from the center longitude (`x = -lon mod 360`).
//!
//! ## Singularities
//!
//! The points `up` and `-up` are the projection's poles; every `x` maps to
//! them. They still project to finite coordinates (`y = ±90`), and the
//! inverse is exact everywhere else.

use log::debug;
use std::f64::consts::FRAC_PI_2;

use super::{
    java_double_string, piecewise_bucket_height, proportional_bucket_width, MapProjection,
    ProjectionKind,
};
use crate::config::ProjectionConfig;
use crate::constants::{DEG2RAD, LEGACY_CENTER_PLACEHOLDER, POLE_SNAP_TOLERANCE_DEG, RAD2DEG};
use crate::coordinates::{Cartesian3, SpatialPoint, WorldPoint};

/// Oblique cylindrical projection about an arbitrary up direction
///
/// Instances are immutable; recentering builds a new projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ObliqueCylindrical {
    /// Polar axis of the projection (unit length)
    up: Cartesian3,
    up_lon: f64,
    up_lat: f64,
    /// World-origin direction, orthogonal to `up`
    center: Cartesian3,
    center_lon: Option<f64>,
    center_lat: Option<f64>,
    /// World coordinates of the nominal center
    initial: WorldPoint,
}

impl ObliqueCylindrical {
    /// Build from an up direction, snapping it to the configured rounding step
    ///
    /// When `config.round` is non-zero both angles are snapped to the nearest
    /// multiple of it. If the snapped latitude lands on a pole the longitude is
    /// forced to 0, since every longitude names the same pole.
    pub fn from_up(up_lon: f64, up_lat: f64, config: &ProjectionConfig) -> Self {
        if !config.rounding_enabled() {
            return Self::from_up_exact(up_lon, up_lat);
        }

        let mut lon = config.snap(up_lon);
        let lat = config.snap(up_lat);
        if (lat.abs() - 90.0).abs() < POLE_SNAP_TOLERANCE_DEG {
            lon = 0.0;
        }
        Self::from_up_exact(lon, lat)
    }

    /// Build from an up direction exactly as given
    pub fn from_up_exact(up_lon: f64, up_lat: f64) -> Self {
        let up = Cartesian3::from_lon_lat_degrees(up_lon, up_lat);

        // Pick the point 90° of colatitude from `up` on its own meridian plane
        let center = if up_lat > 0.0 {
            Cartesian3::from_lon_lat_degrees(180.0 + up_lon, 90.0 - up_lat)
        } else {
            Cartesian3::from_lon_lat_degrees(up_lon, 90.0 + up_lat)
        };

        debug!(
            "Oblique cylindrical projection with up=({}, {})",
            up_lon, up_lat
        );

        ObliqueCylindrical {
            up,
            up_lon,
            up_lat,
            center,
            center_lon: None,
            center_lat: None,
            initial: WorldPoint::new(0.0, 0.0),
        }
    }

    /// Build a projection whose equator passes through the given center point
    ///
    /// The center is snapped with the configured step, the up direction is
    /// taken 90° north of it along its meridian, and the center's own world
    /// coordinates are recorded as [`initial`](Self::initial).
    pub fn from_center(center_lon: f64, center_lat: f64, config: &ProjectionConfig) -> Self {
        let lon = config.snap(center_lon);
        let lat = config.snap(center_lat);

        let (up_lon, up_lat) = if lat >= 0.0 {
            (lon + 180.0, 90.0 - lat)
        } else {
            (lon, 90.0 + lat)
        };

        let mut projection = Self::from_up(up_lon, up_lat, config);
        projection.center_lon = Some(lon);
        projection.center_lat = Some(lat);
        projection.initial = projection.spatial_to_world(SpatialPoint::new(lon, lat));

        debug!(
            "Centered at ({}, {}), initial world point ({}, {})",
            lon, lat, projection.initial.x, projection.initial.y
        );
        projection
    }

    /// Unit polar axis of the projection
    pub fn up(&self) -> Cartesian3 {
        self.up
    }

    /// Western-leading longitude of the up direction, after any rounding
    pub fn up_lon(&self) -> f64 {
        self.up_lon
    }

    /// Latitude of the up direction, after any rounding
    pub fn up_lat(&self) -> f64 {
        self.up_lat
    }

    /// Direction that maps to the world origin
    pub fn center(&self) -> Cartesian3 {
        self.center
    }

    /// World coordinates of the nominal center point
    pub fn initial(&self) -> WorldPoint {
        self.initial
    }
}

impl MapProjection for ObliqueCylindrical {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::ObliqueCylindrical
    }

    fn center_lon(&self) -> Option<f64> {
        self.center_lon
    }

    fn center_lat(&self) -> Option<f64> {
        self.center_lat
    }

    fn bucket_width(&self, ppd: f64) -> f64 {
        proportional_bucket_width(ppd)
    }

    fn bucket_height(&self, ppd: f64) -> f64 {
        piecewise_bucket_height(ppd)
    }

    fn spatial_to_world(&self, spatial: SpatialPoint) -> WorldPoint {
        let pt = spatial.to_cartesian();

        // Drop the component along `up`, then measure the angle around it
        let no_z = pt - self.up * self.up.dot(&pt);
        let x = Cartesian3::new(
            no_z.dot(&self.center),
            no_z.dot(&self.center.cross(&self.up)),
            0.0,
        )
        .lon_radians();

        // asin(up·pt) goes NaN when rounding pushes the dot past ±1
        let y = FRAC_PI_2 - self.up.separation(&pt);

        WorldPoint::new((x * RAD2DEG).rem_euclid(360.0), y * RAD2DEG)
    }

    fn world_to_spatial(&self, world: WorldPoint) -> SpatialPoint {
        let x = world.x * DEG2RAD;
        let y = world.y * DEG2RAD;

        let pt = (self.center * y.cos() + self.up * y.sin()).rotate(&self.up, x);

        SpatialPoint::new((pt.lon_radians() * RAD2DEG).rem_euclid(360.0), pt.lat_degrees())
    }

    fn query_fragment(&self) -> String {
        format!(
            "&TRACK_centerLat={placeholder}&TRACK_centerLon={placeholder}&TRACK_upLat={}&TRACK_upLon={}&TRACK_format=c",
            java_double_string(self.up_lat),
            java_double_string(self.up_lon),
            placeholder = LEGACY_CENTER_PLACEHOLDER,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::lon_difference;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn rounding(step: f64) -> ProjectionConfig {
        ProjectionConfig::with_round(step).unwrap()
    }

    fn assert_world(actual: WorldPoint, x: f64, y: f64) {
        assert!(
            lon_difference(actual.x, x).abs() < 1e-9,
            "x: expected {}, got {}",
            x,
            actual.x
        );
        assert!((actual.y - y).abs() < 1e-9, "y: expected {}, got {}", y, actual.y);
    }

    #[test]
    fn test_center_origin_scenario() {
        let proj = ObliqueCylindrical::from_center(0.0, 0.0, &ProjectionConfig::default());

        assert_world(proj.spatial_to_world(SpatialPoint::new(0.0, 0.0)), 0.0, 0.0);
        // 90° W lands at x = 270 in the [0, 360) convention
        let w = proj.spatial_to_world(SpatialPoint::new(90.0, 0.0));
        assert_world(w, 270.0, 0.0);
        assert!(w.x >= 0.0 && w.x < 360.0);

        assert_world(proj.initial(), 0.0, 0.0);
    }

    #[test]
    fn test_north_up_is_plain_cylindrical() {
        let proj = ObliqueCylindrical::from_center(0.0, 0.0, &ProjectionConfig::default());
        let w = proj.spatial_to_world(SpatialPoint::new(300.0, 45.0));
        assert_world(w, 60.0, 45.0);
        let w = proj.spatial_to_world(SpatialPoint::new(30.0, -20.0));
        assert_world(w, 330.0, -20.0);
    }

    #[rstest]
    #[case(0.0, 90.0)]
    #[case(45.0, 30.0)]
    #[case(200.0, -60.0)]
    #[case(359.0, 0.0)]
    #[case(10.0, -90.0)]
    fn test_orthogonality(#[case] up_lon: f64, #[case] up_lat: f64) {
        let proj = ObliqueCylindrical::from_up_exact(up_lon, up_lat);
        assert_relative_eq!(proj.up().norm(), 1.0, epsilon = 1e-12);
        assert!(proj.center().dot(&proj.up()).abs() < 1e-9);
    }

    #[test]
    fn test_center_derivation_hemispheres() {
        let north = ObliqueCylindrical::from_up_exact(10.0, 60.0);
        let expected = Cartesian3::from_lon_lat_degrees(190.0, 30.0);
        assert!(north.center().separation(&expected) < 1e-12);

        let south = ObliqueCylindrical::from_up_exact(10.0, -60.0);
        let expected = Cartesian3::from_lon_lat_degrees(10.0, 30.0);
        assert!(south.center().separation(&expected) < 1e-12);
    }

    #[test]
    fn test_from_center_places_center_on_equator() {
        for &(lon, lat) in &[(10.0, 30.0), (10.0, -30.0), (250.0, 0.0), (77.0, 89.0)] {
            let proj = ObliqueCylindrical::from_center(lon, lat, &ProjectionConfig::default());
            let up_to_center = proj
                .up()
                .separation(&Cartesian3::from_lon_lat_degrees(lon, lat));
            assert_relative_eq!(up_to_center, FRAC_PI_2, epsilon = 1e-12);
            assert!(proj.initial().y.abs() < 1e-9);
            assert_eq!(proj.center_lon(), Some(lon));
            assert_eq!(proj.center_lat(), Some(lat));
        }
    }

    #[test]
    fn test_from_up_has_no_center() {
        let proj = ObliqueCylindrical::from_up_exact(10.0, 60.0);
        assert_eq!(proj.center_lon(), None);
        assert_eq!(proj.center_lat(), None);
        assert!(proj.projection_center_east_leading().is_none());
        assert_eq!(proj.initial(), WorldPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_rounding_snaps_up_vector() {
        let proj = ObliqueCylindrical::from_up(12.3, 44.8, &rounding(0.5));
        assert_eq!(proj.up_lon(), 12.5);
        assert_eq!(proj.up_lat(), 45.0);
    }

    #[rstest]
    #[case(10.0, 30.0)]
    #[case(12.5, -45.0)]
    #[case(357.5, 2.5)]
    fn test_rounding_is_idempotent(#[case] up_lon: f64, #[case] up_lat: f64) {
        let rounded = ObliqueCylindrical::from_up(up_lon, up_lat, &rounding(2.5));
        let exact = ObliqueCylindrical::from_up_exact(up_lon, up_lat);
        assert_eq!(rounded.up_lon(), exact.up_lon());
        assert_eq!(rounded.up_lat(), exact.up_lat());
        assert_eq!(rounded, exact);
    }

    #[rstest]
    #[case(123.0, 89.8)]
    #[case(45.0, 90.0)]
    #[case(300.0, -89.9)]
    fn test_pole_canonicalization(#[case] up_lon: f64, #[case] up_lat: f64) {
        let proj = ObliqueCylindrical::from_up(up_lon, up_lat, &rounding(0.5));
        assert_eq!(proj.up_lon(), 0.0);
        assert_eq!(proj.up_lat().abs(), 90.0);
    }

    #[test]
    fn test_no_canonicalization_without_rounding() {
        let proj = ObliqueCylindrical::from_up(123.0, 90.0, &ProjectionConfig::default());
        assert_eq!(proj.up_lon(), 123.0);
    }

    #[test]
    fn test_rounded_center_keeps_initial_point() {
        // The center snaps to the equator, putting `up` on the pole, where the
        // longitude is canonicalized; `initial` records where the center went.
        let proj = ObliqueCylindrical::from_center(37.2, 0.1, &rounding(1.0));
        assert_eq!(proj.center_lon(), Some(37.0));
        assert_eq!(proj.center_lat(), Some(0.0));
        assert_eq!(proj.up_lon(), 0.0);

        let initial = proj.initial();
        let back = proj.world_to_spatial(initial);
        assert!(lon_difference(back.lon, 37.0).abs() < 1e-9);
        assert!(back.lat.abs() < 1e-9);
    }

    #[test]
    fn test_singular_points_are_finite() {
        let proj = ObliqueCylindrical::from_up_exact(33.0, 21.0);
        let up = SpatialPoint::new(33.0, 21.0);
        let down = SpatialPoint::new(213.0, -21.0);

        let w_up = proj.spatial_to_world(up);
        assert!(w_up.is_finite());
        assert_relative_eq!(w_up.y, 90.0, epsilon = 1e-6);

        let w_down = proj.spatial_to_world(down);
        assert!(w_down.is_finite());
        assert_relative_eq!(w_down.y, -90.0, epsilon = 1e-6);

        // Exact Cartesian poles of a north-up projection
        let north_up = ObliqueCylindrical::from_up_exact(0.0, 90.0);
        let w = north_up.spatial_to_world(SpatialPoint::new(0.0, 90.0));
        assert!(w.is_finite());
        assert_relative_eq!(w.y, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_antipode_of_center_is_finite() {
        let proj = ObliqueCylindrical::from_center(20.0, 40.0, &ProjectionConfig::default());
        let w = proj.spatial_to_world(SpatialPoint::new(200.0, -40.0));
        assert!(w.is_finite());
        assert!(lon_difference(w.x, 180.0).abs() < 1e-9);
        assert!(w.y.abs() < 1e-9);
    }

    #[test]
    fn test_inverse_of_origin_is_center() {
        let proj = ObliqueCylindrical::from_up_exact(100.0, 50.0);
        let p = proj.world_to_spatial(WorldPoint::new(0.0, 0.0));
        let direction = p.to_cartesian();
        assert!(direction.separation(&proj.center()) < 1e-12);
    }

    #[test]
    fn test_bucket_metrics() {
        let proj = ObliqueCylindrical::from_up_exact(0.0, 90.0);
        assert_eq!(proj.bucket_width(1.0), 360.0);
        assert_eq!(proj.bucket_width(8.0), 45.0);
        assert_eq!(proj.bucket_height(1.0), 88.0);
        assert_eq!(proj.bucket_height(3.99), 88.0);
        assert_eq!(proj.bucket_height(4.0), 88.0);
        assert_eq!(proj.bucket_height(8.0), 44.0);
        assert_eq!(proj.upper_limit(), 88.0);
        assert_eq!(proj.lower_limit(), -88.0);
    }

    #[test]
    fn test_query_fragment() {
        let proj = ObliqueCylindrical::from_up_exact(180.0, 90.0);
        assert_eq!(
            proj.query_fragment(),
            "&TRACK_centerLat=888&TRACK_centerLon=888&TRACK_upLat=90.0&TRACK_upLon=180.0&TRACK_format=c"
        );

        let proj = ObliqueCylindrical::from_up_exact(12.5, -33.25);
        assert_eq!(
            proj.query_fragment(),
            "&TRACK_centerLat=888&TRACK_centerLon=888&TRACK_upLat=-33.25&TRACK_upLon=12.5&TRACK_format=c"
        );
    }
}
