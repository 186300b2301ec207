//! Test fixtures for route-planner.
//!
//! Provides realistic test data including:
//! - Utrecht / Amsterdam area locations (coordinates from OpenStreetMap)
//! - A `Point` builder over them

pub mod utrecht_locations;

pub use utrecht_locations::*;
