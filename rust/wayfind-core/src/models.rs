use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Which authored path network a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Walking,
    Driving,
    Accessible,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Walking => "walking",
            Network::Driving => "driving",
            Network::Accessible => "accessible",
        }
    }
}

/// An authored polyline: an ordered sequence of >= 2 coordinates whose
/// consecutive pairs are graph edges. Segments are surveyed independently
/// and may cross or touch without sharing exact coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,
    pub network: Network,
    pub nodes: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleType::Car => write!(f, "car"),
            VehicleType::Motorcycle => write!(f, "motorcycle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceKind {
    Building,
    Gate,
    Parking { vehicle: VehicleType },
    Kiosk,
}

/// An entity the engine binds into the path network: a building, a campus
/// gate, a parking area or the fixed kiosk origin. Buildings may carry a
/// dedicated access coordinate (their door) distinct from the centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_lng: Option<f64>,
    #[serde(flatten)]
    pub kind: PlaceKind,
}

impl Place {
    /// The coordinate used to bind this place into the path network: the
    /// dedicated access point when present, else the primary coordinate.
    pub fn anchor(&self) -> Coordinate {
        match (self.node_lat, self.node_lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            _ => Coordinate::new(self.lat, self.lng),
        }
    }

    pub fn is_gate(&self) -> bool {
        matches!(self.kind, PlaceKind::Gate)
    }

    pub fn is_parking(&self) -> bool {
        matches!(self.kind, PlaceKind::Parking { .. })
    }

    pub fn is_parking_for(&self, vehicle: VehicleType) -> bool {
        matches!(self.kind, PlaceKind::Parking { vehicle: v } if v == vehicle)
    }

    /// A start from which a driving leg can begin without first walking to
    /// a vehicle: a gate, a parking area, or the kiosk.
    pub fn is_vehicle_capable(&self) -> bool {
        matches!(
            self.kind,
            PlaceKind::Gate | PlaceKind::Parking { .. } | PlaceKind::Kiosk
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Driving,
    Accessible,
}

impl TravelMode {
    pub fn network(&self) -> Network {
        match self {
            TravelMode::Walking => Network::Walking,
            TravelMode::Driving => Network::Driving,
            TravelMode::Accessible => Network::Accessible,
        }
    }

    /// Display color for a phase travelled in this mode.
    pub fn phase_color(&self) -> &'static str {
        match self {
            TravelMode::Walking => "#4caf50",
            TravelMode::Driving => "#2196f3",
            TravelMode::Accessible => "#9c27b0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepIcon {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
    UTurn,
    Arrive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_m: f64,
    pub icon: StepIcon,
}

/// One single-mode leg of a composed journey. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePhase {
    pub index: usize,
    pub mode: TravelMode,
    pub start_id: String,
    pub end_id: String,
    pub start_name: String,
    pub end_name: String,
    pub color: String,
    pub path: Vec<Coordinate>,
    pub steps: Vec<RouteStep>,
    pub distance_m: f64,
}

/// Degraded-behavior annotations the caller must be able to distinguish
/// from a clean network route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteNotice {
    /// The requested endpoint was not reachable on the accessible network;
    /// the route ends at the nearest reachable point instead.
    AccessibleEndpointSubstituted {
        requested: String,
        reached: Coordinate,
    },
    /// The phase's endpoints bound to disconnected parts of the network;
    /// its geometry is the straight line between the two anchors.
    StraightLineFallback { phase: usize },
}

/// The full composed journey handed to the renderer and the route store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationRoute {
    pub start_id: String,
    pub end_id: String,
    pub mode: TravelMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_id: Option<String>,
    pub path: Vec<Coordinate>,
    pub steps: Vec<RouteStep>,
    pub distance_m: f64,
    pub phases: Vec<RoutePhase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<RouteNotice>,
}
