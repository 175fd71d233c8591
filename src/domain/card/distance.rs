//! Great-circle distance and coarse travel-time estimates.
//!
//! Stateless queries used by the card view to tell a viewer how far
//! away a trip's destination is. Estimates are deliberately rough:
//! driving at 60 km/h door to door, flying at 800 km/h with a flight
//! only suggested beyond 200 km.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const DRIVING_SPEED_KMH: f64 = 60.0;
const FLIGHT_SPEED_KMH: f64 = 800.0;
const FLIGHT_MIN_DISTANCE_KM: f64 = 200.0;

/// Distance and travel-time estimate between a viewer and a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub driving_hours: f64,
    /// Only offered for distances beyond 200 km.
    pub flight_hours: Option<f64>,
}

/// Haversine great-circle distance in kilometers.
pub fn great_circle_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Computes distance and coarse travel times from a viewer coordinate
/// to a destination coordinate.
pub fn estimate_travel(viewer: GeoPoint, destination: GeoPoint) -> TravelEstimate {
    let distance_km = great_circle_km(viewer, destination);
    TravelEstimate {
        distance_km,
        driving_hours: distance_km / DRIVING_SPEED_KMH,
        flight_hours: (distance_km > FLIGHT_MIN_DISTANCE_KM)
            .then(|| distance_km / FLIGHT_SPEED_KMH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let lagos = point(6.5244, 3.3792);
        assert!(great_circle_km(lagos, lagos) < 1e-9);
    }

    #[test]
    fn lagos_to_abuja_is_roughly_536_km() {
        let lagos = point(6.5244, 3.3792);
        let abuja = point(9.0765, 7.3986);
        let distance = great_circle_km(lagos, abuja);
        assert!((distance - 536.0).abs() < 15.0, "got {}", distance);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(6.5244, 3.3792);
        let b = point(51.5074, -0.1278);
        let forward = great_circle_km(a, b);
        let backward = great_circle_km(b, a);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn short_hops_offer_no_flight() {
        let a = point(6.5244, 3.3792);
        let b = point(6.6018, 3.3515);
        let estimate = estimate_travel(a, b);
        assert!(estimate.distance_km < 200.0);
        assert!(estimate.flight_hours.is_none());
        assert!(estimate.driving_hours > 0.0);
    }

    #[test]
    fn long_trips_offer_a_flight_estimate() {
        let lagos = point(6.5244, 3.3792);
        let london = point(51.5074, -0.1278);
        let estimate = estimate_travel(lagos, london);

        assert!(estimate.distance_km > 4_000.0);
        let flight = estimate.flight_hours.unwrap();
        assert!((flight - estimate.distance_km / 800.0).abs() < 1e-9);
        assert!((estimate.driving_hours - estimate.distance_km / 60.0).abs() < 1e-9);
    }
}
