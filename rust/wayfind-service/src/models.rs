use serde::{Deserialize, Serialize};

use wayfind_core::{
    Coordinate, NavigationRoute, RouteNotice, RouteOptions, RoutePhase, RouteStep, StepIcon,
    TravelMode, VehicleType,
};

#[derive(Debug, Deserialize)]
pub struct ComputeRouteRequest {
    pub start_id: String,
    pub end_id: String,
    pub mode: TravelMode,
    #[serde(default)]
    pub vehicle: Option<VehicleType>,
    #[serde(default)]
    pub waypoint_ids: Vec<String>,
    /// The parking area chosen after an `awaiting_parking_selection`
    /// response; resumes that composition.
    #[serde(default)]
    pub parking_id: Option<String>,
    #[serde(default)]
    pub options: Option<RouteOptions>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComputeRouteResponse {
    Complete {
        id: String,
        route: RouteDto,
    },
    AwaitingParkingSelection {
        required_vehicle: VehicleType,
        message: String,
    },
}

/// Wire form of a route: distances are additionally pre-formatted for the
/// kiosk display, which renders them verbatim.
#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub start_id: String,
    pub end_id: String,
    pub mode: TravelMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_id: Option<String>,
    pub path: Vec<Coordinate>,
    pub steps: Vec<StepDto>,
    pub distance: String,
    pub distance_m: f64,
    pub phases: Vec<PhaseDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<RouteNotice>,
}

#[derive(Debug, Serialize)]
pub struct PhaseDto {
    pub index: usize,
    pub mode: TravelMode,
    pub start_id: String,
    pub end_id: String,
    pub start_name: String,
    pub end_name: String,
    pub color: String,
    pub path: Vec<Coordinate>,
    pub steps: Vec<StepDto>,
    pub distance: String,
    pub distance_m: f64,
}

#[derive(Debug, Serialize)]
pub struct StepDto {
    pub instruction: String,
    pub distance: String,
    pub icon: StepIcon,
}

/// Metres below one kilometre, one-decimal kilometres above.
pub fn format_distance(m: f64) -> String {
    if m < 1000.0 {
        format!("{} m", m.round() as i64)
    } else {
        format!("{:.1} km", m / 1000.0)
    }
}

impl From<&NavigationRoute> for RouteDto {
    fn from(r: &NavigationRoute) -> Self {
        Self {
            start_id: r.start_id.clone(),
            end_id: r.end_id.clone(),
            mode: r.mode,
            vehicle: r.vehicle,
            parking_id: r.parking_id.clone(),
            path: r.path.clone(),
            steps: r.steps.iter().map(StepDto::from).collect(),
            distance: format_distance(r.distance_m),
            distance_m: r.distance_m,
            phases: r.phases.iter().map(PhaseDto::from).collect(),
            notices: r.notices.clone(),
        }
    }
}

impl From<&RoutePhase> for PhaseDto {
    fn from(p: &RoutePhase) -> Self {
        Self {
            index: p.index,
            mode: p.mode,
            start_id: p.start_id.clone(),
            end_id: p.end_id.clone(),
            start_name: p.start_name.clone(),
            end_name: p.end_name.clone(),
            color: p.color.clone(),
            path: p.path.clone(),
            steps: p.steps.iter().map(StepDto::from).collect(),
            distance: format_distance(p.distance_m),
            distance_m: p.distance_m,
        }
    }
}

impl From<&RouteStep> for StepDto {
    fn from(s: &RouteStep) -> Self {
        Self {
            instruction: s.instruction.clone(),
            distance: format_distance(s.distance_m),
            icon: s.icon,
        }
    }
}
