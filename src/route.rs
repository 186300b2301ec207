//! Leg and total accounting shared by every strategy.
//!
//! Duration rule: each leg carries travel time only, and the route total adds
//! the service time of every stop that is arrived at. The first stop is the
//! departure point, so its service time is never counted.

use crate::error::StageError;
use crate::haversine::{TravelEstimate, haversine_km};
use crate::model::{Leg, Point, RouteResult, Strategy};

pub(crate) fn distance_between(from: &Point, to: &Point) -> f64 {
    haversine_km(from.lat, from.lng, to.lat, to.lng)
}

/// Sum of consecutive straight-line legs.
pub(crate) fn path_length(route: &[&Point]) -> f64 {
    route
        .windows(2)
        .map(|pair| distance_between(pair[0], pair[1]))
        .sum()
}

/// Builds a result for an already ordered list of stops.
pub(crate) fn build_result(
    route: &[&Point],
    estimate: &TravelEstimate,
    strategy: Strategy,
) -> RouteResult {
    let mut legs = Vec::with_capacity(route.len().saturating_sub(1));
    let mut total_distance_km = 0.0;
    let mut total_duration_minutes = 0.0;

    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let distance_km = distance_between(from, to);
        let duration_minutes = estimate.minutes_for(distance_km);

        total_distance_km += distance_km;
        total_duration_minutes += duration_minutes + to.service_minutes();

        legs.push(Leg {
            from_id: from.id.clone(),
            to_id: to.id.clone(),
            distance_km,
            duration_minutes,
            duration_in_traffic_minutes: None,
        });
    }

    RouteResult {
        ordered_ids: route.iter().map(|p| p.id.clone()).collect(),
        total_distance_km,
        total_duration_minutes,
        legs,
        strategy,
        geometry: None,
    }
}

/// Like [`build_result`], but fails if any leg distance is not finite.
pub(crate) fn build_checked(
    route: &[&Point],
    estimate: &TravelEstimate,
    strategy: Strategy,
) -> Result<RouteResult, StageError> {
    let result = build_result(route, estimate, strategy);
    if let Some(leg) = result.legs.iter().find(|leg| !leg.distance_km.is_finite()) {
        return Err(StageError::NonFiniteDistance {
            from: leg.from_id.clone(),
            to: leg.to_id.clone(),
        });
    }
    Ok(result)
}

/// Index of the point that should lead the route.
///
/// A start that is a member (by id) leads directly. A start from outside the
/// set, such as a depot, selects the closest member instead.
pub(crate) fn start_index(points: &[Point], start: Option<&Point>) -> usize {
    let Some(start) = start else {
        return 0;
    };
    if let Some(index) = points.iter().position(|p| p.id == start.id) {
        return index;
    }

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, point) in points.iter().enumerate() {
        let distance = distance_between(start, point);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}
