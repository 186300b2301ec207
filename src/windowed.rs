//! Routing for requests that carry appointment times.
//!
//! Appointed stops are visited in chronological order right after the start,
//! then the unappointed stops are threaded on by nearest neighbor from the
//! route tail. Travel time is not reconciled against the gaps between
//! appointments, so a stop may be reached after its `fixed_arrival_time`.
//! `arrival_window_minutes` is not consulted.

use crate::haversine::TravelEstimate;
use crate::model::{Point, RouteResult, Strategy};
use crate::nearest::closest;
use crate::route::{build_result, start_index};

/// Visiting order: start, appointments by time, then the rest by proximity.
pub fn windowed_order<'a>(points: &'a [Point], start: Option<&Point>) -> Vec<&'a Point> {
    if points.is_empty() {
        return Vec::new();
    }

    let first = start_index(points, start);
    let start = &points[first];

    let mut appointed: Vec<&Point> = Vec::new();
    let mut remaining: Vec<&Point> = Vec::new();
    for (index, point) in points.iter().enumerate() {
        if index == first {
            continue;
        }
        if point.has_fixed_arrival() {
            appointed.push(point);
        } else {
            remaining.push(point);
        }
    }
    // Stable, so equal appointment times keep input order.
    appointed.sort_by_key(|point| point.fixed_arrival_time);

    let mut route = Vec::with_capacity(points.len());
    route.push(start);
    route.extend(appointed);

    while !remaining.is_empty() {
        let tail = route[route.len() - 1];
        let next = closest(tail, &remaining);
        route.push(remaining.remove(next));
    }

    route
}

/// Time-window-aware route with leg and total accounting.
pub fn windowed_route(
    points: &[Point],
    start: Option<&Point>,
    estimate: &TravelEstimate,
) -> RouteResult {
    if points.len() < 2 {
        return RouteResult::trivial(points);
    }
    let route = windowed_order(points, start);
    build_result(&route, estimate, Strategy::TimeWindow)
}
