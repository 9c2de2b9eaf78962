use serde::{Deserialize, Serialize};

/// Both thresholds were tuned empirically for one campus's path density,
/// so they stay configurable rather than hard-coded.
pub const DEFAULT_MERGE_THRESHOLD_M: f64 = 10.0;
pub const DEFAULT_TURN_THRESHOLD_DEG: f64 = 20.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// Nodes from different segments closer than this merge into one junction.
    pub merge_threshold_m: f64,
    /// Minimum bearing change at a joint before a turn instruction is emitted.
    pub turn_threshold_deg: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            merge_threshold_m: DEFAULT_MERGE_THRESHOLD_M,
            turn_threshold_deg: DEFAULT_TURN_THRESHOLD_DEG,
        }
    }
}
