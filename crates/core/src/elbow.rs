//! Elbow solver
//!
//! Repositions the bend point of a two-segment leader so that the arrow
//! segment (end to elbow) makes the commanded angle with the horizontal.
//! The vertical offset between end and elbow is preserved; only the
//! horizontal run changes. Leaders that are already nearly level are
//! straightened instead by moving the arrow tip onto the elbow's height.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::geometry::Point2D;

/// Result of a single solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// New leader points. `end` differs from the input only when the leader
    /// was straightened.
    Solved { elbow: Point2D, end: Point2D },
    /// The generated arrow segment would be shorter than the minimum length.
    TooShort,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }
}

/// Quadrant of the elbow relative to the arrow tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Up and to the right
    First,
    /// Up and to the left
    Second,
    /// Down and to the left
    Third,
    /// Down and to the right
    Fourth,
}

impl Quadrant {
    /// Classify the direction `theta` returned by `atan2`.
    ///
    /// Intervals are half-open with the lower bound included. `-π` belongs to
    /// the third quadrant and `π` to the second.
    pub fn from_theta(theta: f64) -> Self {
        if (0.0..FRAC_PI_2).contains(&theta) {
            Self::First
        } else if theta >= FRAC_PI_2 {
            Self::Second
        } else if theta < -FRAC_PI_2 {
            Self::Third
        } else {
            Self::Fourth
        }
    }

    /// Reflect the commanded angle into this quadrant.
    pub fn reflect(self, angle: f64) -> f64 {
        match self {
            Self::First => angle,
            Self::Second => PI - angle,
            Self::Third => PI + angle,
            Self::Fourth => 2.0 * PI - angle,
        }
    }
}

/// Compute a new elbow for the leader ending at `target`.
///
/// `angle` is in radians and expected in `(0, π/2)`.
pub fn solve(
    angle: f64,
    scale: f64,
    target: Point2D,
    elbow: Point2D,
    thresholds: &ThresholdConfig,
) -> SolveOutcome {
    let min_length = thresholds.scaled_min_leader_length(scale);
    let delta_x = elbow.x - target.x;
    let delta_y = elbow.y - target.y;

    if delta_y.abs() < thresholds.scaled_min_delta_y(scale) {
        let straightened = Point2D::new(target.x, elbow.y);
        if straightened.distance_to(&elbow) < min_length {
            return SolveOutcome::TooShort;
        }

        tracing::trace!(?target, ?straightened, "straightening nearly level leader");
        return SolveOutcome::Solved { elbow, end: straightened };
    }

    let quadrant = Quadrant::from_theta(delta_y.atan2(delta_x));
    let target_angle = quadrant.reflect(angle);
    tracing::trace!(?quadrant, target_angle, "elbow quadrant");

    let len = delta_y.abs() / angle.sin();
    let new_elbow =
        Point2D::new(target.x + len * target_angle.cos(), target.y + len * target_angle.sin());

    if new_elbow.distance_to(&target) < min_length {
        return SolveOutcome::TooShort;
    }

    SolveOutcome::Solved { elbow: new_elbow, end: target }
}
