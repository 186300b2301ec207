//! 2-opt local search over an open path.
//!
//! Reverses a segment `[i..=j]` whenever that shortens the path, taking the
//! first improvement found and rescanning from the top. Candidates are scored
//! with a full path recompute. The result is a local optimum and depends on
//! the nearest-neighbor seed.

use crate::haversine::TravelEstimate;
use crate::model::{Point, RouteResult, Strategy};
use crate::nearest::nearest_neighbor_order;
use crate::route::{build_result, path_length};

/// Default cap on improving passes.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Improves `route` in place order-wise and returns the improved order.
///
/// With `keep_first` set, index 0 never moves.
pub fn two_opt_order<'a>(
    route: Vec<&'a Point>,
    keep_first: bool,
    max_iterations: usize,
) -> Vec<&'a Point> {
    let n = route.len();
    if n < 3 {
        return route;
    }

    let first_movable = usize::from(keep_first);
    let mut best_route = route;
    let mut best_distance = path_length(&best_route);
    let mut iterations = 0;
    let mut improved = true;

    while improved && iterations < max_iterations {
        improved = false;
        iterations += 1;

        'scan: for i in first_movable..n - 1 {
            for j in i + 1..n {
                // Reversing the whole path leaves its length unchanged.
                if i == 0 && j == n - 1 {
                    continue;
                }

                let mut candidate = best_route.clone();
                candidate[i..=j].reverse();
                let distance = path_length(&candidate);

                if distance < best_distance {
                    best_route = candidate;
                    best_distance = distance;
                    improved = true;
                    break 'scan;
                }
            }
        }
    }

    tracing::trace!(iterations, best_distance, "2-opt finished");
    best_route
}

/// Nearest-neighbor seed followed by 2-opt improvement.
pub fn two_opt_route(
    points: &[Point],
    start: Option<&Point>,
    estimate: &TravelEstimate,
    max_iterations: usize,
) -> RouteResult {
    if points.len() < 2 {
        return RouteResult::trivial(points);
    }
    let seed = nearest_neighbor_order(points, start);
    let route = two_opt_order(seed, start.is_some(), max_iterations);
    build_result(&route, estimate, Strategy::TwoOpt)
}
