//! Haversine distance and constant-speed travel estimates.
//!
//! Great-circle distance ignores the road network, so every local strategy
//! works from the same straight-line estimate. The external routing service
//! is the only source of road distances.

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers.
///
/// Symmetric, and zero only for coordinate-identical inputs. Out-of-range
/// coordinates are not rejected.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Converts straight-line distances into travel minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEstimate {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for TravelEstimate {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl TravelEstimate {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Travel time in minutes for a distance in km.
    pub fn minutes_for(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }
}
