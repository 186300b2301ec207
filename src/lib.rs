//! route-planner core
//!
//! Orders geolocated stops into efficient visiting routes, for one driver or
//! split across several, with a fallback chain that always yields a route.

pub mod error;
pub mod haversine;
pub mod model;
pub mod nearest;
pub mod optimizer;
pub mod osrm;
pub mod partition;
pub mod polyline;
mod route;
pub mod traits;
pub mod two_opt;
pub mod windowed;

pub use error::{PlannerError, RoutingServiceError, StageError};
pub use haversine::haversine_km;
pub use model::{DriverRoute, Leg, Point, RouteResult, Strategy};
pub use optimizer::{Optimizer, OptimizerOptions};
pub use partition::PartitionOptions;
