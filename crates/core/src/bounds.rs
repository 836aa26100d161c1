//! Text bounding rectangle
//!
//! Derives the rectangle that covers the visible text of a note, excluding
//! its leaders. The rectangle is anchored on the note's insertion point and
//! depends on the horizontal alignment.

use serde::{Deserialize, Serialize};

use crate::error::{LeaderError, LeaderResult};
use crate::geometry::{BoundingRect, Point2D};

/// Horizontal anchoring of a text block relative to its position point
///
/// Alignment names a host does not know about are kept verbatim in
/// `Unsupported` so that the failure surfaces during processing, where it
/// aborts only the affected note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Unsupported(String),
}

impl HorizontalAlign {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for HorizontalAlign {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Unsupported(value),
        }
    }
}

impl From<HorizontalAlign> for String {
    fn from(value: HorizontalAlign) -> Self {
        match value {
            HorizontalAlign::Unsupported(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

/// Compute the text bounding rectangle.
///
/// `height` is scaled by the view scale, `width` is not. `padding` must
/// already be in model units. Centered text ignores the padding on the
/// horizontal axis.
pub fn compute_bounds(
    position: Point2D,
    width: f64,
    height: f64,
    scale: f64,
    padding: f64,
    align: &HorizontalAlign,
) -> LeaderResult<BoundingRect> {
    let ymin = position.y - height * scale;
    let ymax = ymin + height * scale;

    let (xmin, xmax) = match align {
        HorizontalAlign::Left => (position.x - padding, position.x + width - padding),
        HorizontalAlign::Center => (position.x - width * 0.5, position.x + width * 0.5),
        HorizontalAlign::Right => (position.x - width + padding, position.x),
        HorizontalAlign::Unsupported(_) => {
            return Err(LeaderError::InvalidAlignment(align.clone()));
        }
    };

    Ok(BoundingRect { xmin, xmax, ymin: ymin - padding, ymax: ymax + padding })
}
