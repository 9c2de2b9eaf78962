pub mod cache;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod models;
pub mod options;
pub mod policy;
pub mod steps;

pub use cache::{CacheKey, GraphCache};
pub use engine::{find_shortest_path, PathFinder, PathOutcome};
pub use errors::RouteError;
pub use models::{
    Coordinate, NavigationRoute, Network, PathSegment, Place, PlaceKind, RouteNotice,
    RoutePhase, RouteStep, StepIcon, TravelMode, VehicleType,
};
pub use options::RouteOptions;
pub use policy::{compose, Composition, NetworkSegments, PendingRoute, RouteRequest};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
