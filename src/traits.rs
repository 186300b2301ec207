//! Seams between the optimizer and its collaborators.
//!
//! A routing service is injected rather than reached through global state, so
//! the optimizer can be exercised with a fake service and no network.

use crate::error::{RoutingServiceError, StageError};
use crate::model::{Point, RouteResult, Strategy};
use crate::optimizer::OptimizerOptions;
use crate::polyline::Polyline;

/// Origin, destination and the unordered stops between them, as `(lat, lng)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub origin: (f64, f64),
    pub destination: (f64, f64),
    pub waypoints: Vec<(f64, f64)>,
}

/// One leg as reported by the service, in metres and seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TripLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub duration_in_traffic_seconds: Option<f64>,
}

/// The service's answer to a [`TripRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    /// Visiting order as indices into `TripRequest::waypoints`.
    pub waypoint_order: Vec<usize>,
    /// Legs from origin to destination, in visiting order.
    pub legs: Vec<TripLeg>,
    pub geometry: Option<Polyline>,
}

/// A directions service able to reorder waypoints between fixed endpoints.
///
/// Implementations make exactly one attempt per call; retrying is the
/// optimizer's business, and it falls back to a different strategy instead.
pub trait RoutingService {
    /// Service-side limit on the number of waypoints, if any.
    fn max_waypoints(&self) -> Option<usize> {
        None
    }

    fn optimize_trip(&self, request: &TripRequest) -> Result<TripPlan, RoutingServiceError>;
}

impl<S: RoutingService + ?Sized> RoutingService for Box<S> {
    fn max_waypoints(&self) -> Option<usize> {
        (**self).max_waypoints()
    }

    fn optimize_trip(&self, request: &TripRequest) -> Result<TripPlan, RoutingServiceError> {
        (**self).optimize_trip(request)
    }
}

/// One member of the optimizer's fallback chain.
pub trait OptimizationStage {
    fn strategy(&self) -> Strategy;

    /// Orders at least two uniquely identified points.
    fn attempt(
        &self,
        points: &[Point],
        start: Option<&Point>,
        options: &OptimizerOptions,
    ) -> Result<RouteResult, StageError>;
}
