//! Road geometry for an optimized route.
//!
//! The external routing service returns GeoJSON-ordered `[lng, lat]` pairs.
//! They are flipped to `(lat, lng)` once, here, so the rest of the crate
//! only ever sees one coordinate order.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;

/// A route geometry as decoded `(lat, lng)` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from `(lat, lng)` points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Creates a polyline from GeoJSON `[lng, lat]` positions.
    pub fn from_lng_lat(positions: &[[f64; 2]]) -> Self {
        Self {
            points: positions.iter().map(|[lng, lat]| (*lat, *lng)).collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Straight-line length along the geometry.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
            .sum()
    }
}
