//! Leader processing for a single text entity
//!
//! Runs the elbow solver over every leader of a text block and decides, per
//! leader, whether the solved points are committed or a warning is raised.
//! The caller receives the full updated leader list and commits it as one
//! unit; a hard error returns no leaders at all.

use serde::{Deserialize, Serialize};

use crate::bounds::{compute_bounds, HorizontalAlign};
use crate::config::ThresholdConfig;
use crate::elbow::{solve, SolveOutcome};
use crate::error::{LeaderError, LeaderResult};
use crate::geometry::{BoundingRect, Point2D};
use crate::warning::{LeaderWarning, WarningCode};

/// Two-segment leader: `end` is the arrow tip, `elbow` the bend point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderSegment {
    pub elbow: Point2D,
    pub end: Point2D,
}

impl LeaderSegment {
    pub fn new(elbow: Point2D, end: Point2D) -> Self {
        Self { elbow, end }
    }

    /// Length of the arrow segment
    pub fn arrow_length(&self) -> f64 {
        self.elbow.distance_to(&self.end)
    }
}

/// Snapshot of a text note and its leaders
///
/// `position` is the top-left insertion point for left-aligned text, the
/// top-center for centered text and the top-right for right-aligned text.
/// `padding` is in model units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
    pub horizontal_align: HorizontalAlign,
    pub padding: f64,
    pub leaders: Vec<LeaderSegment>,
}

impl TextBlock {
    pub fn bounds(&self, scale: f64) -> LeaderResult<BoundingRect> {
        compute_bounds(
            self.position,
            self.width,
            self.height,
            scale,
            self.padding,
            &self.horizontal_align,
        )
    }
}

/// Output of one processing pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessReport {
    /// All leaders in their original order, updated where accepted
    pub leaders: Vec<LeaderSegment>,
    pub warnings: Vec<LeaderWarning>,
    /// Number of leaders whose points were replaced
    pub committed: usize,
}

impl ProcessReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Process every leader of `text_block` at the commanded angle.
///
/// The angle is given in degrees and must lie in `(0, 90)`. Leaders whose
/// solve fails, or whose new elbow falls inside the text, are left as they
/// were and reported as warnings.
pub fn process(
    text_block: &TextBlock,
    commanded_angle_degrees: f64,
    scale: f64,
    thresholds: &ThresholdConfig,
) -> LeaderResult<ProcessReport> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LeaderError::InvalidScale(scale));
    }
    if !commanded_angle_degrees.is_finite()
        || commanded_angle_degrees <= 0.0
        || commanded_angle_degrees >= 90.0
    {
        return Err(LeaderError::InvalidAngle(commanded_angle_degrees));
    }

    let bounds = text_block.bounds(scale)?;
    let angle = commanded_angle_degrees.to_radians();

    let mut leaders = text_block.leaders.clone();
    let mut warnings = Vec::new();
    let mut committed = 0;

    for (index, leader) in leaders.iter_mut().enumerate() {
        match solve(angle, scale, leader.end, leader.elbow, thresholds) {
            SolveOutcome::TooShort => {
                tracing::warn!(leader = index, "arrow segment too short, leader left unchanged");
                warnings.push(LeaderWarning::new(WarningCode::ElbowTooShort, index));
            }
            SolveOutcome::Solved { elbow, .. } if bounds.contains(&elbow) => {
                tracing::warn!(leader = index, ?elbow, "elbow lands in text, leader unchanged");
                warnings.push(LeaderWarning::new(WarningCode::ElbowInText, index));
            }
            SolveOutcome::Solved { elbow, end } => {
                tracing::debug!(leader = index, ?elbow, ?end, "leader adjusted");
                *leader = LeaderSegment { elbow, end };
                committed += 1;
            }
        }
    }

    Ok(ProcessReport { leaders, warnings, committed })
}
