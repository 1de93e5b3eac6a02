use crate::core::RoutePoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine)
///
/// NaN coordinates produce NaN rather than a panic.
pub fn haversine_m(a: &RoutePoint, b: &RoutePoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> RoutePoint {
        RoutePoint::new(lat, lon, "2024-01-01T00:00:00Z")
    }

    #[test]
    fn test_same_point_is_zero() {
        let a = point(17.385044, 78.486671);
        assert_eq!(haversine_m(&a, &a), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = point(17.0, 78.0);
        let b = point(17.3, 78.9);
        assert_eq!(haversine_m(&a, &b), haversine_m(&b, &a));
    }

    #[test]
    fn test_small_offset() {
        let a = point(17.0, 78.0);
        let b = point(17.001, 78.001);
        let d = haversine_m(&a, &b);
        assert!((d - 153.86).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_m(&point(0.0, 0.0), &point(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_nan_propagates() {
        let d = haversine_m(&point(f64::NAN, 0.0), &point(1.0, 1.0));
        assert!(d.is_nan());
    }
}
