//! Great-circle distance between coordinates.
//!
//! Straight-line flight distance; drones do not follow roads.

use crate::models::Coordinate;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Symmetric and zero for identical points. Out-of-range coordinates are not
/// rejected; the result is simply geometrically meaningless.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance in meters.
pub fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
    haversine_km(from, to) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinate::new(47.340793, 19.160145);
        assert_eq!(haversine_km(point, point), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Budapest (47.4979, 19.0402) to Vienna (48.2082, 16.3738), roughly 214 km
        let dist = haversine_km(Coordinate::new(47.4979, 19.0402), Coordinate::new(48.2082, 16.3738));
        assert!(dist > 205.0 && dist < 225.0, "Budapest to Vienna should be ~214km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(47.2, 19.3);
        let b = Coordinate::new(47.5, 18.9);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_equator_degree() {
        // One hundredth of a degree of longitude on the equator
        let dist = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01));
        let expected = EARTH_RADIUS_KM * 0.01_f64.to_radians();
        assert!((dist - expected).abs() < 1e-9);
    }

    #[test]
    fn test_meters() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 0.1);
        assert!((haversine_m(a, b) - haversine_km(a, b) * 1000.0).abs() < 1e-9);
    }
}
