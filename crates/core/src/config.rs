//! Length thresholds for leader validation

use serde::{Deserialize, Serialize};

/// An eighth of an inch, expressed in feet.
pub const DEFAULT_THRESHOLD: f64 = 0.125 / 12.0;

/// Minimum lengths used by the elbow solver
///
/// Both values are in the drawing's length unit and are multiplied by the
/// view scale before any comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Shortest arrow segment that may be committed
    pub min_leader_length: f64,

    /// Vertical offset below which a leader is straightened instead of angled
    pub min_delta_y: f64,
}

impl ThresholdConfig {
    pub fn scaled_min_leader_length(&self, scale: f64) -> f64 {
        self.min_leader_length * scale
    }

    pub fn scaled_min_delta_y(&self, scale: f64) -> f64 {
        self.min_delta_y * scale
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { min_leader_length: DEFAULT_THRESHOLD, min_delta_y: DEFAULT_THRESHOLD }
    }
}
