//! Error types for the route planner.

use thiserror::Error;

/// Precondition violations raised by the public entry points.
///
/// Strategy failures never surface here; the optimizer absorbs them.
#[derive(Debug, Error, PartialEq)]
pub enum PlannerError {
    #[error("point id {0:?} appears more than once")]
    DuplicateId(String),
    #[error("driver count must be at least 1, got {0}")]
    InvalidDriverCount(usize),
}

/// Failure of the external routing service.
#[derive(Debug, Error)]
pub enum RoutingServiceError {
    #[error("routing service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service rejected the request: {code}{}", detail(.message))]
    Rejected {
        code: String,
        message: Option<String>,
    },
    #[error("{requested} waypoints exceed the service limit of {limit}")]
    TooManyWaypoints { requested: usize, limit: usize },
    #[error("malformed routing response: {0}")]
    MalformedResponse(String),
    #[error("routing service unavailable: {0}")]
    Unavailable(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

/// Why a single stage of the fallback chain gave up.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Service(#[from] RoutingServiceError),
    #[error("distance between {from} and {to} is not finite")]
    NonFiniteDistance { from: String, to: String },
}
