use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{PathFinder, PathOutcome};
use crate::errors::RouteError;
use crate::geometry::haversine_distance;
use crate::models::{
    Coordinate, NavigationRoute, Network, PathSegment, Place, RouteNotice, RoutePhase,
    TravelMode, VehicleType,
};
use crate::steps::synthesize_steps;

/// The three authored network collections, loaded fresh per request by the
/// caller. Accessible routing only ever sees the accessible collection.
#[derive(Debug, Clone, Default)]
pub struct NetworkSegments {
    pub walking: Vec<PathSegment>,
    pub driving: Vec<PathSegment>,
    pub accessible: Vec<PathSegment>,
}

impl NetworkSegments {
    pub fn for_mode(&self, mode: TravelMode) -> &[PathSegment] {
        match mode {
            TravelMode::Walking => &self.walking,
            TravelMode::Driving => &self.driving,
            TravelMode::Accessible => &self.accessible,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Place,
    pub end: Place,
    pub mode: TravelMode,
    #[serde(default)]
    pub vehicle: Option<VehicleType>,
    #[serde(default)]
    pub waypoints: Vec<Place>,
}

/// Outcome of `compose`: either a finished route, or a request for an
/// out-of-band parking selection the caller resumes with.
#[derive(Debug)]
pub enum Composition {
    Complete(NavigationRoute),
    AwaitingParkingSelection(PendingRoute),
}

/// A driving request that started at a plain building: the engine cannot
/// know where the vehicle is parked, so composition halts until the
/// caller supplies a matching-type parking area.
#[derive(Debug, Clone)]
pub struct PendingRoute {
    request: RouteRequest,
    pub required_vehicle: VehicleType,
}

impl PendingRoute {
    pub fn resume(
        &self,
        parking: &Place,
        networks: &NetworkSegments,
        places: &[Place],
        finder: &PathFinder<'_>,
    ) -> Result<NavigationRoute, RouteError> {
        if !parking.is_parking_for(self.required_vehicle) {
            return Err(RouteError::UnsuitableParking {
                place: parking.name.clone(),
                vehicle: self.required_vehicle,
            });
        }

        let req = &self.request;
        // Walk to the selected parking, then drive onward as if it were
        // the start.
        let mut legs = vec![LegPlan {
            mode: TravelMode::Walking,
            from: Endpoint::from(&req.start),
            to: Endpoint::from(parking),
        }];
        let stops: Vec<&Place> = req.waypoints.iter().chain([&req.end]).collect();
        legs.extend(driving_legs(
            Endpoint::from(parking),
            &stops,
            self.required_vehicle,
            places,
        )?);

        run_legs(
            req,
            Some(self.required_vehicle),
            Some(parking.id.clone()),
            &legs,
            networks,
            finder,
        )
    }
}

#[derive(Debug, Clone)]
struct Endpoint {
    id: String,
    name: String,
    anchor: Coordinate,
}

impl From<&Place> for Endpoint {
    fn from(p: &Place) -> Self {
        Self { id: p.id.clone(), name: p.name.clone(), anchor: p.anchor() }
    }
}

#[derive(Debug, Clone)]
struct LegPlan {
    mode: TravelMode,
    from: Endpoint,
    to: Endpoint,
}

/// Decide the leg sequence for a navigation request and solve each leg.
///
/// Walking and accessible requests chain start -> waypoints -> end on
/// their own network. Driving requests additionally resolve every
/// non-gate/non-parking stop to its nearest matching parking area; a
/// driving request from a plain building yields
/// `AwaitingParkingSelection` instead of a route.
pub fn compose(
    request: &RouteRequest,
    networks: &NetworkSegments,
    places: &[Place],
    finder: &PathFinder<'_>,
) -> Result<Composition, RouteError> {
    match request.mode {
        TravelMode::Walking | TravelMode::Accessible => {
            let legs = chain_legs(request.mode, &request.start, &request.waypoints, &request.end);
            let route = run_legs(request, None, None, &legs, networks, finder)?;
            Ok(Composition::Complete(route))
        }
        TravelMode::Driving => {
            let vehicle = request.vehicle.unwrap_or(VehicleType::Car);
            if !request.start.is_vehicle_capable() {
                return Ok(Composition::AwaitingParkingSelection(PendingRoute {
                    request: request.clone(),
                    required_vehicle: vehicle,
                }));
            }
            let stops: Vec<&Place> = request.waypoints.iter().chain([&request.end]).collect();
            let legs = driving_legs(Endpoint::from(&request.start), &stops, vehicle, places)?;
            let route = run_legs(request, Some(vehicle), None, &legs, networks, finder)?;
            Ok(Composition::Complete(route))
        }
    }
}

/// The parking area of the requested vehicle type nearest to `near`.
/// Ties break on place id for determinism.
pub fn nearest_parking<'a>(
    places: &'a [Place],
    vehicle: VehicleType,
    near: Coordinate,
) -> Option<&'a Place> {
    places
        .iter()
        .filter(|p| p.is_parking_for(vehicle))
        .min_by(|a, b| {
            haversine_distance(a.anchor(), near)
                .total_cmp(&haversine_distance(b.anchor(), near))
                .then_with(|| a.id.cmp(&b.id))
        })
}

fn chain_legs(
    mode: TravelMode,
    start: &Place,
    waypoints: &[Place],
    end: &Place,
) -> Vec<LegPlan> {
    let stops: Vec<Endpoint> = std::iter::once(start)
        .chain(waypoints.iter())
        .chain(std::iter::once(end))
        .map(Endpoint::from)
        .collect();
    stops
        .windows(2)
        .map(|w| LegPlan { mode, from: w[0].clone(), to: w[1].clone() })
        .collect()
}

/// Expand driving stops into legs, tracking where the vehicle is. A stop
/// that is a gate or a matching parking area is driven to directly; any
/// other stop is reached via its nearest matching parking plus a walking
/// tail, and when another stop follows, a walk back to that parking
/// precedes the next driving leg.
fn driving_legs(
    start: Endpoint,
    stops: &[&Place],
    vehicle: VehicleType,
    places: &[Place],
) -> Result<Vec<LegPlan>, RouteError> {
    let mut legs = Vec::new();
    let mut vehicle_at = start;

    for (i, stop) in stops.iter().enumerate() {
        let last = i + 1 == stops.len();
        if stop.is_gate() || stop.is_parking_for(vehicle) {
            legs.push(LegPlan {
                mode: TravelMode::Driving,
                from: vehicle_at.clone(),
                to: Endpoint::from(*stop),
            });
            vehicle_at = Endpoint::from(*stop);
        } else {
            let parking = nearest_parking(places, vehicle, stop.anchor())
                .ok_or(RouteError::NoMatchingParking { vehicle })?;
            let lot = Endpoint::from(parking);
            legs.push(LegPlan {
                mode: TravelMode::Driving,
                from: vehicle_at.clone(),
                to: lot.clone(),
            });
            legs.push(LegPlan {
                mode: TravelMode::Walking,
                from: lot.clone(),
                to: Endpoint::from(*stop),
            });
            if !last {
                legs.push(LegPlan {
                    mode: TravelMode::Walking,
                    from: Endpoint::from(*stop),
                    to: lot.clone(),
                });
            }
            vehicle_at = lot;
        }
    }
    Ok(legs)
}

fn run_legs(
    request: &RouteRequest,
    vehicle: Option<VehicleType>,
    parking_id: Option<String>,
    legs: &[LegPlan],
    networks: &NetworkSegments,
    finder: &PathFinder<'_>,
) -> Result<NavigationRoute, RouteError> {
    let mut phases = Vec::with_capacity(legs.len());
    let mut notices = Vec::new();
    for (index, leg) in legs.iter().enumerate() {
        phases.push(run_leg(index, leg, networks, finder, &mut notices)?);
    }

    let route = assemble(request, vehicle, parking_id, phases, notices);
    info!(
        start = %route.start_id,
        end = %route.end_id,
        phases = route.phases.len(),
        distance_m = route.distance_m,
        "route composed"
    );
    Ok(route)
}

fn run_leg(
    index: usize,
    leg: &LegPlan,
    networks: &NetworkSegments,
    finder: &PathFinder<'_>,
    notices: &mut Vec<RouteNotice>,
) -> Result<RoutePhase, RouteError> {
    let segments = networks.for_mode(leg.mode);

    let outcome = if leg.mode == TravelMode::Accessible {
        accessible_outcome(leg, segments, finder, notices)?
    } else {
        match finder.find(leg.from.anchor, leg.to.anchor, leg.mode.network(), segments) {
            Ok(outcome) => {
                if outcome.is_straight_line() {
                    notices.push(RouteNotice::StraightLineFallback { phase: index });
                }
                outcome
            }
            Err(source) => {
                return Err(RouteError::LegFailed {
                    index,
                    from: leg.from.name.clone(),
                    to: leg.to.name.clone(),
                    source: Box::new(source),
                })
            }
        }
    };

    Ok(make_phase(index, leg, &outcome, finder))
}

/// Accessible legs degrade differently: a disconnected destination is
/// substituted with the nearest reachable point (surfaced as a notice),
/// and only a network with nothing reachable at all is reported as fully
/// unreachable.
fn accessible_outcome(
    leg: &LegPlan,
    segments: &[PathSegment],
    finder: &PathFinder<'_>,
    notices: &mut Vec<RouteNotice>,
) -> Result<PathOutcome, RouteError> {
    let unreachable = || RouteError::AccessibleUnreachable { place: leg.to.name.clone() };

    if segments.is_empty() {
        return Err(unreachable());
    }
    match finder.find(leg.from.anchor, leg.to.anchor, Network::Accessible, segments) {
        Ok(outcome) if !outcome.is_straight_line() => Ok(outcome),
        Ok(_) => match finder.nearest_reachable(
            leg.from.anchor,
            leg.to.anchor,
            Network::Accessible,
            segments,
        ) {
            Ok((reached, outcome)) => {
                notices.push(RouteNotice::AccessibleEndpointSubstituted {
                    requested: leg.to.id.clone(),
                    reached,
                });
                Ok(outcome)
            }
            Err(_) => Err(unreachable()),
        },
        Err(_) => Err(unreachable()),
    }
}

fn make_phase(
    index: usize,
    leg: &LegPlan,
    outcome: &PathOutcome,
    finder: &PathFinder<'_>,
) -> RoutePhase {
    let steps = synthesize_steps(outcome.path(), &leg.from.name, &leg.to.name, finder.options());
    RoutePhase {
        index,
        mode: leg.mode,
        start_id: leg.from.id.clone(),
        end_id: leg.to.id.clone(),
        start_name: leg.from.name.clone(),
        end_name: leg.to.name.clone(),
        color: leg.mode.phase_color().to_string(),
        path: outcome.path().to_vec(),
        steps,
        distance_m: outcome.distance_m(),
    }
}

fn assemble(
    request: &RouteRequest,
    vehicle: Option<VehicleType>,
    parking_id: Option<String>,
    phases: Vec<RoutePhase>,
    notices: Vec<RouteNotice>,
) -> NavigationRoute {
    let mut path: Vec<Coordinate> = Vec::new();
    let mut steps = Vec::new();
    let mut distance_m = 0.0;
    for phase in &phases {
        for &c in &phase.path {
            // Phase seams repeat the shared endpoint
            if path.last() != Some(&c) {
                path.push(c);
            }
        }
        steps.extend(phase.steps.iter().cloned());
        distance_m += phase.distance_m;
    }

    NavigationRoute {
        start_id: request.start.id.clone(),
        end_id: request.end.id.clone(),
        mode: request.mode,
        vehicle,
        parking_id,
        path,
        steps,
        distance_m,
        phases,
        notices,
    }
}
