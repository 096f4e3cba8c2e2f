pub mod cartesian;
pub mod point;

pub use cartesian::Cartesian3;
pub use point::{lon_difference, SpatialPoint, WorldPoint};

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_spatial_point_direction() {
        let p = SpatialPoint::new(180.0, 0.0);
        let v = p.to_cartesian();
        assert!((v.x + 1.0).abs() < 1e-15);
        assert!((v.lon_radians() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_angular_distance() {
        // Same point should have zero distance
        let p1 = SpatialPoint::new(10.0, 30.0).to_cartesian();
        assert!(p1.separation(&p1).abs() < 1e-15);

        // Antipodes are PI apart
        let p2 = SpatialPoint::new(190.0, -30.0).to_cartesian();
        assert!((p1.separation(&p2) - PI).abs() < 1e-12);

        // Quarter turn along a meridian
        let p3 = SpatialPoint::new(10.0, -60.0).to_cartesian();
        assert!((p1.separation(&p3) - PI / 2.0).abs() < 1e-12);
    }
}
