//! OSRM HTTP adapter for waypoint optimization.
//!
//! Uses the Trip service with the first coordinate pinned as source and the
//! last as destination, which matches the origin/waypoints/destination shape
//! of [`TripRequest`].
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#trip-service>

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::RoutingServiceError;
use crate::polyline::Polyline;
use crate::traits::{RoutingService, TripLeg, TripPlan, TripRequest};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Largest waypoint list sent in one request.
    pub max_waypoints: usize,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            max_waypoints: 25,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE`,
    /// `OSRM_TIMEOUT_SECS` and `OSRM_MAX_WAYPOINTS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("OSRM_BASE_URL").unwrap_or(defaults.base_url),
            profile: env::var("OSRM_PROFILE").unwrap_or(defaults.profile),
            timeout_secs: env_number("OSRM_TIMEOUT_SECS", defaults.timeout_secs),
            max_waypoints: env_number("OSRM_MAX_WAYPOINTS", defaults.max_waypoints),
        }
    }
}

fn env_number<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn trip_url(&self, request: &TripRequest) -> String {
        let coords = std::iter::once(&request.origin)
            .chain(request.waypoints.iter())
            .chain(std::iter::once(&request.destination))
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/trip/v1/{}/{}?roundtrip=false&source=first&destination=last&steps=false&geometries=geojson&overview=full",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl RoutingService for OsrmClient {
    fn max_waypoints(&self) -> Option<usize> {
        Some(self.config.max_waypoints)
    }

    fn optimize_trip(&self, request: &TripRequest) -> Result<TripPlan, RoutingServiceError> {
        if request.waypoints.len() > self.config.max_waypoints {
            return Err(RoutingServiceError::TooManyWaypoints {
                requested: request.waypoints.len(),
                limit: self.config.max_waypoints,
            });
        }

        let url = self.trip_url(request);
        tracing::debug!(%url, waypoints = request.waypoints.len(), "requesting OSRM trip");

        // OSRM reports failures with a 4xx status and a JSON body carrying the
        // code, so the body is decoded before the status is considered.
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = match response.json::<OsrmTripResponse>() {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(err.into()),
            Err(_) => {
                return Err(RoutingServiceError::Unavailable(format!(
                    "OSRM returned status {}",
                    status
                )));
            }
        };

        plan_from_response(body, request.waypoints.len())
    }
}

/// Converts a Trip response into a [`TripPlan`] for `waypoint_count` waypoints.
pub fn plan_from_response(
    response: OsrmTripResponse,
    waypoint_count: usize,
) -> Result<TripPlan, RoutingServiceError> {
    if response.code != "Ok" {
        return Err(RoutingServiceError::Rejected {
            code: response.code,
            message: response.message,
        });
    }

    let coordinate_count = waypoint_count + 2;
    let waypoints = response.waypoints.unwrap_or_default();
    if waypoints.len() != coordinate_count {
        return Err(RoutingServiceError::MalformedResponse(format!(
            "expected {} waypoints, got {}",
            coordinate_count,
            waypoints.len()
        )));
    }

    // by_position[p] = input coordinate visited p-th
    let mut by_position = vec![None; coordinate_count];
    for (input_index, waypoint) in waypoints.iter().enumerate() {
        if waypoint.trips_index != 0 {
            return Err(RoutingServiceError::MalformedResponse(
                "waypoints split across several trips".to_string(),
            ));
        }
        match by_position.get_mut(waypoint.waypoint_index) {
            Some(slot) if slot.is_none() => *slot = Some(input_index),
            _ => {
                return Err(RoutingServiceError::MalformedResponse(format!(
                    "invalid waypoint_index {}",
                    waypoint.waypoint_index
                )));
            }
        }
    }

    let visit_order: Vec<usize> = by_position.into_iter().flatten().collect();
    if visit_order.first() != Some(&0) || visit_order.last() != Some(&(coordinate_count - 1)) {
        return Err(RoutingServiceError::MalformedResponse(
            "trip does not start at origin and end at destination".to_string(),
        ));
    }
    let waypoint_order = visit_order[1..coordinate_count - 1]
        .iter()
        .map(|input_index| input_index - 1)
        .collect();

    let trip = response
        .trips
        .and_then(|trips| trips.into_iter().next())
        .ok_or_else(|| RoutingServiceError::MalformedResponse("no trip returned".to_string()))?;

    let legs = trip
        .legs
        .into_iter()
        .map(|leg| TripLeg {
            distance_meters: leg.distance,
            duration_seconds: leg.duration,
            duration_in_traffic_seconds: None,
        })
        .collect();

    let geometry = trip
        .geometry
        .map(|geometry| Polyline::from_lng_lat(&geometry.coordinates));

    Ok(TripPlan {
        waypoint_order,
        legs,
        geometry,
    })
}

#[derive(Debug, Deserialize)]
pub struct OsrmTripResponse {
    pub code: String,
    pub message: Option<String>,
    pub waypoints: Option<Vec<OsrmTripWaypoint>>,
    pub trips: Option<Vec<OsrmTrip>>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmTripWaypoint {
    pub waypoint_index: usize,
    pub trips_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct OsrmTrip {
    pub legs: Vec<OsrmLeg>,
    pub geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmLeg {
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<[f64; 2]>,
}
