//! Multi-driver partitioning: cluster first, route second.
//!
//! Points are grouped with a few rounds of k-means on raw coordinates, then
//! each group is optimized independently (and in parallel) by the
//! single-route [`Optimizer`]. Centroids are seeded at random, so unseeded
//! runs on the same input may partition differently.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::PlannerError;
use crate::haversine::haversine_km;
use crate::model::{DriverRoute, Point, RouteResult, ensure_unique_ids};
use crate::optimizer::Optimizer;

#[derive(Debug, Clone)]
pub struct PartitionOptions {
    /// Upper bound on assign/recompute rounds.
    pub max_iterations: usize,
    /// A centroid moving less than this (degrees, per axis) counts as settled.
    pub convergence_degrees: f64,
    /// Fixed seed for reproducible clustering; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            convergence_degrees: 0.0001,
            seed: None,
        }
    }
}

impl PartitionOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Splits `points` into exactly `cluster_count` groups by proximity.
///
/// With no more points than clusters, each point gets its own group in input
/// order and the remaining groups are empty. Otherwise a cluster left empty
/// after k-means takes the front half of the largest one; the result is not
/// guaranteed to be balanced.
pub fn cluster_points<'a, R>(
    points: &'a [Point],
    cluster_count: usize,
    options: &PartitionOptions,
    rng: &mut R,
) -> Vec<Vec<&'a Point>>
where
    R: Rng,
{
    if cluster_count == 0 {
        return Vec::new();
    }
    if points.len() <= cluster_count {
        let mut clusters: Vec<Vec<&Point>> = points.iter().map(|p| vec![p]).collect();
        clusters.resize_with(cluster_count, Vec::new);
        return clusters;
    }

    let mut centers: Vec<(f64, f64)> = (0..cluster_count)
        .map(|_| points[rng.gen_range(0..points.len())].location())
        .collect();

    let mut clusters: Vec<Vec<&Point>> = vec![Vec::new(); cluster_count];
    let mut changed = true;
    let mut iterations = 0;

    while changed && iterations < options.max_iterations {
        changed = false;
        iterations += 1;

        clusters = vec![Vec::new(); cluster_count];
        for point in points {
            clusters[nearest_center(point, &centers)].push(point);
        }

        for (center, members) in centers.iter_mut().zip(&clusters) {
            if members.is_empty() {
                continue;
            }
            let count = members.len() as f64;
            let lat = members.iter().map(|p| p.lat).sum::<f64>() / count;
            let lng = members.iter().map(|p| p.lng).sum::<f64>() / count;

            if (lat - center.0).abs() > options.convergence_degrees
                || (lng - center.1).abs() > options.convergence_degrees
            {
                *center = (lat, lng);
                changed = true;
            }
        }
    }
    tracing::debug!(iterations, clusters = cluster_count, "k-means finished");

    rebalance_empty(&mut clusters);
    clusters
}

fn nearest_center(point: &Point, centers: &[(f64, f64)]) -> usize {
    let mut nearest = 0;
    let mut nearest_distance = f64::INFINITY;
    for (index, (lat, lng)) in centers.iter().enumerate() {
        let distance = haversine_km(point.lat, point.lng, *lat, *lng);
        if distance < nearest_distance {
            nearest_distance = distance;
            nearest = index;
        }
    }
    nearest
}

/// Gives each empty cluster the front half of the current largest cluster.
fn rebalance_empty(clusters: &mut [Vec<&Point>]) {
    for index in 0..clusters.len() {
        if !clusters[index].is_empty() {
            continue;
        }

        let mut largest = 0;
        for (candidate, members) in clusters.iter().enumerate() {
            if members.len() > clusters[largest].len() {
                largest = candidate;
            }
        }

        let size = clusters[largest].len();
        if size > 1 {
            let moved: Vec<&Point> = clusters[largest].drain(..size / 2).collect();
            tracing::warn!(
                empty_cluster = index,
                donor_cluster = largest,
                moved = moved.len(),
                "rebalanced empty cluster; partition may be uneven"
            );
            clusters[index] = moved;
        }
    }
}

impl Optimizer {
    /// Partitions `points` across `driver_count` drivers and optimizes each
    /// share. Always returns `driver_count` routes, in driver order.
    ///
    /// `start_points[i]`, when present, is driver `i`'s preferred start.
    pub fn partition_and_optimize(
        &self,
        points: &[Point],
        driver_count: usize,
        start_points: Option<&[Point]>,
        options: &PartitionOptions,
    ) -> Result<Vec<DriverRoute>, PlannerError> {
        if driver_count == 0 {
            return Err(PlannerError::InvalidDriverCount(driver_count));
        }
        ensure_unique_ids(points)?;

        if points.len() <= driver_count {
            return Ok((0..driver_count)
                .map(|index| match points.get(index) {
                    Some(point) => {
                        DriverRoute::new(index, RouteResult::trivial(std::slice::from_ref(point)))
                    }
                    None => DriverRoute::empty(index),
                })
                .collect());
        }

        let mut rng = options.rng();
        let clusters = cluster_points(points, driver_count, options, &mut rng);

        let routes: Vec<DriverRoute> = clusters
            .into_par_iter()
            .enumerate()
            .map(|(index, members)| {
                if members.is_empty() {
                    return DriverRoute::empty(index);
                }
                let share: Vec<Point> = members.into_iter().cloned().collect();
                let start = start_points.and_then(|starts| starts.get(index));
                DriverRoute::new(index, self.run(&share, start))
            })
            .collect();

        tracing::info!(
            drivers = driver_count,
            points = points.len(),
            empty = routes.iter().filter(|r| r.route.is_empty()).count(),
            "multi-driver routes optimized"
        );
        Ok(routes)
    }
}
