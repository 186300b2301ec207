//! Greedy nearest-neighbor routing.

use crate::haversine::TravelEstimate;
use crate::model::{Point, RouteResult, Strategy};
use crate::route::{build_result, distance_between, start_index};

/// Visiting order built by always advancing to the closest unvisited point.
///
/// Ties keep the earliest candidate in input order. O(n²).
pub fn nearest_neighbor_order<'a>(points: &'a [Point], start: Option<&Point>) -> Vec<&'a Point> {
    if points.is_empty() {
        return Vec::new();
    }

    let first = start_index(points, start);
    let mut unvisited: Vec<&Point> = points
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != first)
        .map(|(_, point)| point)
        .collect();

    let mut route = Vec::with_capacity(points.len());
    route.push(&points[first]);

    while !unvisited.is_empty() {
        let current = route[route.len() - 1];
        let next = closest(current, &unvisited);
        route.push(unvisited.remove(next));
    }

    route
}

/// Nearest-neighbor route with leg and total accounting.
pub fn nearest_neighbor_route(
    points: &[Point],
    start: Option<&Point>,
    estimate: &TravelEstimate,
) -> RouteResult {
    if points.len() < 2 {
        return RouteResult::trivial(points);
    }
    let route = nearest_neighbor_order(points, start);
    build_result(&route, estimate, Strategy::NearestNeighbor)
}

/// Position in `candidates` of the point closest to `from`.
pub(crate) fn closest(from: &Point, candidates: &[&Point]) -> usize {
    let mut nearest = 0;
    let mut nearest_distance = f64::INFINITY;
    for (index, candidate) in candidates.iter().enumerate() {
        let distance = distance_between(from, candidate);
        if distance < nearest_distance {
            nearest_distance = distance;
            nearest = index;
        }
    }
    nearest
}
