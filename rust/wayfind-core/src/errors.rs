use thiserror::Error;

use crate::models::VehicleType;

/// Route computation failures. Every variant carries enough context for
/// the caller to present a specific, distinguishable message; a generic
/// "routing error" is never surfaced.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The point cannot be projected onto any segment: the collection is
    /// empty or every segment is malformed. "No route possible."
    #[error("no path network near ({lat:.6}, {lng:.6}): nothing to project onto")]
    NoProjection { lat: f64, lng: f64 },

    /// A driving scenario needs a parking area of this vehicle type and
    /// none exist on campus.
    #[error("no {vehicle} parking available on campus")]
    NoMatchingParking { vehicle: VehicleType },

    /// The destination is not reachable via any accessible-flagged
    /// segment, even after the nearest-reachable-point fallback.
    #[error("{place} is not reachable on the accessible network")]
    AccessibleUnreachable { place: String },

    /// The parking supplied to resume a pending route does not accept the
    /// requested vehicle type.
    #[error("parking {place} does not accept {vehicle}")]
    UnsuitableParking { place: String, vehicle: VehicleType },

    /// A single leg failing aborts the whole composition; partial
    /// multi-leg routes are never returned.
    #[error("leg {index} ({from} -> {to}) could not be routed: {source}")]
    LegFailed {
        index: usize,
        from: String,
        to: String,
        #[source]
        source: Box<RouteError>,
    },
}
