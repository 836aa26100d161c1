//! Leader Adjustment Core
//!
//! Geometry for re-angling two-segment text leaders: text bounds, the elbow
//! solver, and the per-note leader processor. Everything here is a pure
//! function of its inputs; committing results is left to the host.

pub mod bounds;
pub mod config;
pub mod elbow;
pub mod error;
pub mod geometry;
pub mod processor;
pub mod warning;

pub use bounds::{compute_bounds, HorizontalAlign};
pub use config::{ThresholdConfig, DEFAULT_THRESHOLD};
pub use elbow::{solve, Quadrant, SolveOutcome};
pub use error::{LeaderError, LeaderResult};
pub use geometry::{BoundingRect, Point2D};
pub use processor::{process, LeaderSegment, ProcessReport, TextBlock};
pub use warning::{LeaderWarning, WarningCode};
