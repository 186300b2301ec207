//! Single-route optimizer with a strategy fallback chain.
//!
//! Stages are tried in order until one succeeds:
//! external routing service, 2-opt, nearest neighbor. The identity order is
//! the terminal case and cannot fail, so a route is always produced.
//! Requests carrying appointment times skip the chain and go straight to
//! [`windowed_route`].

use crate::error::{PlannerError, RoutingServiceError, StageError};
use crate::haversine::{DEFAULT_SPEED_KMH, TravelEstimate};
use crate::model::{Leg, Point, RouteResult, Strategy, ensure_unique_ids};
use crate::nearest::nearest_neighbor_order;
use crate::route::{build_checked, build_result, start_index};
use crate::traits::{OptimizationStage, RoutingService, TripRequest};
use crate::two_opt::{DEFAULT_MAX_ITERATIONS, two_opt_order};
use crate::windowed::windowed_route;

#[derive(Debug, Clone)]
pub struct OptimizerOptions {
    /// Assumed average driving speed for straight-line estimates.
    pub average_speed_kmh: f64,
    /// Cap on improving 2-opt passes.
    pub two_opt_max_iterations: usize,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_SPEED_KMH,
            two_opt_max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OptimizerOptions {
    pub fn estimate(&self) -> TravelEstimate {
        TravelEstimate::new(self.average_speed_kmh)
    }
}

pub type BoxedStage = Box<dyn OptimizationStage + Send + Sync>;

/// Stateless between calls; safe to share across threads.
pub struct Optimizer {
    stages: Vec<BoxedStage>,
    options: OptimizerOptions,
}

impl Optimizer {
    /// 2-opt, then nearest neighbor.
    pub fn local() -> Self {
        Self::from_stages(
            vec![Box::new(TwoOptStage), Box::new(NearestNeighborStage)],
            OptimizerOptions::default(),
        )
    }

    /// External service, then 2-opt, then nearest neighbor.
    pub fn with_routing_service<S>(service: S) -> Self
    where
        S: RoutingService + Send + Sync + 'static,
    {
        Self::from_stages(
            vec![
                Box::new(ExternalStage::new(service)),
                Box::new(TwoOptStage),
                Box::new(NearestNeighborStage),
            ],
            OptimizerOptions::default(),
        )
    }

    /// Custom chain. Identity is always appended as the last resort.
    pub fn from_stages(stages: Vec<BoxedStage>, options: OptimizerOptions) -> Self {
        Self { stages, options }
    }

    pub fn with_options(mut self, options: OptimizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &OptimizerOptions {
        &self.options
    }

    /// Strategies attempted for unconstrained input, in order.
    pub fn chain(&self) -> Vec<Strategy> {
        self.stages
            .iter()
            .map(|stage| stage.strategy())
            .chain(std::iter::once(Strategy::Identity))
            .collect()
    }

    pub fn optimize(&self, points: &[Point]) -> Result<RouteResult, PlannerError> {
        self.optimize_from(points, None)
    }

    /// Optimizes with a preferred start.
    ///
    /// Fails only on duplicate ids; every strategy failure is absorbed.
    pub fn optimize_from(
        &self,
        points: &[Point],
        start: Option<&Point>,
    ) -> Result<RouteResult, PlannerError> {
        ensure_unique_ids(points)?;
        Ok(self.run(points, start))
    }

    pub(crate) fn run(&self, points: &[Point], start: Option<&Point>) -> RouteResult {
        if points.len() < 2 {
            return RouteResult::trivial(points);
        }

        if points.iter().any(Point::has_fixed_arrival) {
            tracing::debug!(points = points.len(), "appointment times present, using time-window routing");
            return windowed_route(points, start, &self.options.estimate());
        }

        let preferred = self.stages.first().map(|stage| stage.strategy());
        for stage in &self.stages {
            let strategy = stage.strategy();
            tracing::debug!(?strategy, points = points.len(), "attempting optimization stage");
            match stage.attempt(points, start, &self.options) {
                Ok(result) => {
                    if preferred.is_some_and(|p| strategy.is_degraded_from(p)) {
                        tracing::warn!(?strategy, ?preferred, "route optimization degraded");
                    }
                    return result;
                }
                Err(err) => {
                    tracing::warn!(?strategy, error = %err, "optimization stage failed, falling back");
                }
            }
        }

        tracing::warn!(points = points.len(), "all optimization stages failed, keeping input order");
        identity_route(points, &self.options.estimate())
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::local()
    }
}

/// Input order kept, legs measured as given. Never fails.
pub fn identity_route(points: &[Point], estimate: &TravelEstimate) -> RouteResult {
    if points.len() < 2 {
        return RouteResult::trivial(points);
    }
    let route: Vec<&Point> = points.iter().collect();
    build_result(&route, estimate, Strategy::Identity)
}

pub struct NearestNeighborStage;

impl OptimizationStage for NearestNeighborStage {
    fn strategy(&self) -> Strategy {
        Strategy::NearestNeighbor
    }

    fn attempt(
        &self,
        points: &[Point],
        start: Option<&Point>,
        options: &OptimizerOptions,
    ) -> Result<RouteResult, StageError> {
        let route = nearest_neighbor_order(points, start);
        build_checked(&route, &options.estimate(), Strategy::NearestNeighbor)
    }
}

pub struct TwoOptStage;

impl OptimizationStage for TwoOptStage {
    fn strategy(&self) -> Strategy {
        Strategy::TwoOpt
    }

    fn attempt(
        &self,
        points: &[Point],
        start: Option<&Point>,
        options: &OptimizerOptions,
    ) -> Result<RouteResult, StageError> {
        let seed = nearest_neighbor_order(points, start);
        let route = two_opt_order(seed, start.is_some(), options.two_opt_max_iterations);
        build_checked(&route, &options.estimate(), Strategy::TwoOpt)
    }
}

/// Delegates ordering to a [`RoutingService`].
///
/// The route's first point is the origin and its last the destination; the
/// service reorders everything in between.
pub struct ExternalStage<S> {
    service: S,
}

impl<S: RoutingService> ExternalStage<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S: RoutingService> OptimizationStage for ExternalStage<S> {
    fn strategy(&self) -> Strategy {
        Strategy::External
    }

    fn attempt(
        &self,
        points: &[Point],
        start: Option<&Point>,
        _options: &OptimizerOptions,
    ) -> Result<RouteResult, StageError> {
        let mut ordered: Vec<&Point> = points.iter().collect();
        let first = start_index(points, start);
        if first != 0 {
            let lead = ordered.remove(first);
            ordered.insert(0, lead);
        }

        let origin = ordered[0];
        let destination = ordered[ordered.len() - 1];
        let inner = &ordered[1..ordered.len() - 1];

        if let Some(limit) = self.service.max_waypoints() {
            if inner.len() > limit {
                return Err(RoutingServiceError::TooManyWaypoints {
                    requested: inner.len(),
                    limit,
                }
                .into());
            }
        }

        let request = TripRequest {
            origin: origin.location(),
            destination: destination.location(),
            waypoints: inner.iter().map(|p| p.location()).collect(),
        };
        let plan = self.service.optimize_trip(&request)?;

        if !is_permutation(&plan.waypoint_order, inner.len()) {
            return Err(RoutingServiceError::MalformedResponse(format!(
                "waypoint order {:?} is not a permutation of {} waypoints",
                plan.waypoint_order,
                inner.len()
            ))
            .into());
        }
        if plan.legs.len() != points.len() - 1 {
            return Err(RoutingServiceError::MalformedResponse(format!(
                "expected {} legs, got {}",
                points.len() - 1,
                plan.legs.len()
            ))
            .into());
        }

        let mut route = Vec::with_capacity(points.len());
        route.push(origin);
        route.extend(plan.waypoint_order.iter().map(|&k| inner[k]));
        route.push(destination);

        let mut legs = Vec::with_capacity(plan.legs.len());
        let mut total_distance_km = 0.0;
        let mut total_duration_minutes = 0.0;
        for (pair, trip_leg) in route.windows(2).zip(&plan.legs) {
            let distance_km = trip_leg.distance_meters / 1000.0;
            let duration_minutes = trip_leg.duration_seconds / 60.0;
            if !(distance_km.is_finite() && distance_km >= 0.0)
                || !(duration_minutes.is_finite() && duration_minutes >= 0.0)
            {
                return Err(RoutingServiceError::MalformedResponse(format!(
                    "invalid leg {} -> {}",
                    pair[0].id, pair[1].id
                ))
                .into());
            }

            total_distance_km += distance_km;
            total_duration_minutes += duration_minutes + pair[1].service_minutes();
            legs.push(Leg {
                from_id: pair[0].id.clone(),
                to_id: pair[1].id.clone(),
                distance_km,
                duration_minutes,
                duration_in_traffic_minutes: trip_leg.duration_in_traffic_seconds.map(|s| s / 60.0),
            });
        }

        Ok(RouteResult {
            ordered_ids: route.iter().map(|p| p.id.clone()).collect(),
            total_distance_km,
            total_duration_minutes,
            legs,
            strategy: Strategy::External,
            geometry: plan.geometry,
        })
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
