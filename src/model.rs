//! Plain data records exchanged with callers.
//!
//! Everything here is an immutable computation result: built fresh by each
//! optimization call and owned by the caller afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::PlannerError;
use crate::polyline::Polyline;

/// A location to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Minutes spent at the stop once arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_duration_minutes: Option<f64>,
    /// Appointment time. Its presence on any point switches the whole request
    /// to time-window routing.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_arrival_time: Option<OffsetDateTime>,
    /// Tolerance around the appointment. Display only; ordering ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_window_minutes: Option<f64>,
}

impl Point {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            service_duration_minutes: None,
            fixed_arrival_time: None,
            arrival_window_minutes: None,
        }
    }

    pub fn with_service_minutes(mut self, minutes: f64) -> Self {
        self.service_duration_minutes = Some(minutes);
        self
    }

    pub fn with_fixed_arrival(mut self, at: OffsetDateTime) -> Self {
        self.fixed_arrival_time = Some(at);
        self
    }

    pub fn with_arrival_window(mut self, minutes: f64) -> Self {
        self.arrival_window_minutes = Some(minutes);
        self
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Service time, treating an absent value as zero.
    pub fn service_minutes(&self) -> f64 {
        self.service_duration_minutes.unwrap_or(0.0)
    }

    pub fn has_fixed_arrival(&self) -> bool {
        self.fixed_arrival_time.is_some()
    }
}

/// Directed segment between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub from_id: String,
    pub to_id: String,
    pub distance_km: f64,
    /// Travel time only; service time at `to_id` is not included.
    pub duration_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_traffic_minutes: Option<f64>,
}

/// Which stage of the optimizer produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Zero or one point; nothing to order.
    Trivial,
    TimeWindow,
    External,
    TwoOpt,
    NearestNeighbor,
    /// Input order kept as-is.
    Identity,
}

impl Strategy {
    /// True when the route came from a stage below the best one available.
    pub fn is_degraded_from(self, preferred: Strategy) -> bool {
        self != preferred && !matches!(self, Strategy::Trivial | Strategy::TimeWindow)
    }
}

/// Output of a single-route optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub ordered_ids: Vec<String>,
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub legs: Vec<Leg>,
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Polyline>,
}

impl RouteResult {
    /// Result with no legs: zero or one stop.
    pub fn trivial(points: &[Point]) -> Self {
        Self {
            ordered_ids: points.iter().map(|p| p.id.clone()).collect(),
            total_distance_km: 0.0,
            total_duration_minutes: 0.0,
            legs: Vec::new(),
            strategy: Strategy::Trivial,
            geometry: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_ids.is_empty()
    }
}

/// One driver's share of a multi-driver request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRoute {
    pub driver_index: usize,
    pub driver_id: String,
    pub route: RouteResult,
}

impl DriverRoute {
    pub fn new(driver_index: usize, route: RouteResult) -> Self {
        Self {
            driver_index,
            driver_id: format!("driver_{driver_index}"),
            route,
        }
    }

    pub fn empty(driver_index: usize) -> Self {
        Self::new(driver_index, RouteResult::trivial(&[]))
    }
}

/// Rejects point sets with repeated ids.
pub fn ensure_unique_ids(points: &[Point]) -> Result<(), PlannerError> {
    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !seen.insert(point.id.as_str()) {
            return Err(PlannerError::DuplicateId(point.id.clone()));
        }
    }
    Ok(())
}
