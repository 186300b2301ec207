//! Utrecht and Amsterdam locations for realistic test fixtures.
//!
//! Coordinates are rounded OpenStreetMap positions; they are routable with
//! an OSRM build of the Netherlands extract.

#![allow(dead_code)]

use route_planner::Point;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn point(&self, id: &str) -> Point {
        Point::new(id, self.lat, self.lng)
    }
}

// ============================================================================
// Depots
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("Utrecht Centraal", 52.0894, 5.1101),
    Location::new("Amsterdam Centraal", 52.3791, 4.9003),
];

// ============================================================================
// Utrecht city
// ============================================================================

pub const UTRECHT: &[Location] = &[
    Location::new("Domtoren", 52.0907, 5.1214),
    Location::new("Neude", 52.0929, 5.1184),
    Location::new("Ledig Erf", 52.0832, 5.1262),
    Location::new("Wilhelminapark", 52.0862, 5.1378),
    Location::new("Griftpark", 52.0985, 5.1265),
    Location::new("Lombok Kanaalstraat", 52.0899, 5.0996),
    Location::new("Galgenwaard", 52.0782, 5.1458),
    Location::new("Uithof Science Park", 52.0853, 5.1742),
    Location::new("Kanaleneiland Zuid", 52.0693, 5.0969),
    Location::new("Zuilen Amsterdamsestraatweg", 52.1096, 5.0987),
    Location::new("Overvecht Centrum", 52.1163, 5.1096),
    Location::new("Leidsche Rijn Centrum", 52.0924, 5.0485),
];

// ============================================================================
// Amsterdam city
// ============================================================================

pub const AMSTERDAM: &[Location] = &[
    Location::new("Dam", 52.3731, 4.8926),
    Location::new("Rijksmuseum", 52.3600, 4.8852),
    Location::new("Vondelpark", 52.3579, 4.8686),
    Location::new("Westerpark", 52.3866, 4.8750),
    Location::new("Oosterpark", 52.3602, 4.9200),
    Location::new("NDSM Werf", 52.4010, 4.8919),
    Location::new("Amstel Station", 52.3466, 4.9176),
    Location::new("Sloterdijk", 52.3889, 4.8378),
];

// ============================================================================
// Helpers
// ============================================================================

/// Points built from `locations`, with ids `{prefix}{index}`.
pub fn points(locations: &[Location], prefix: &str) -> Vec<Point> {
    locations
        .iter()
        .enumerate()
        .map(|(index, location)| location.point(&format!("{prefix}{index}")))
        .collect()
}

/// Both cities interleaved, so input order is geographically poor.
pub fn two_cities() -> Vec<Point> {
    let utrecht = points(UTRECHT, "utr");
    let amsterdam = points(AMSTERDAM, "ams");
    let mut mixed = Vec::with_capacity(utrecht.len() + amsterdam.len());
    let mut utr = utrecht.into_iter();
    let mut ams = amsterdam.into_iter();
    loop {
        match (utr.next(), ams.next()) {
            (None, None) => break,
            (u, a) => mixed.extend(u.into_iter().chain(a)),
        }
    }
    mixed
}

pub fn sorted_ids<'a>(ids: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().cloned().collect();
    ids.sort();
    ids
}
