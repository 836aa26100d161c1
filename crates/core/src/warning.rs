use std::fmt;

use serde::{Deserialize, Serialize};

/// Recoverable per-leader conditions
///
/// A warning leaves its leader untouched but never stops the sibling leaders
/// of the same note from being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    ElbowTooShort,
    ElbowInText,
}

impl WarningCode {
    /// Stable identifier hosts can use to register or filter the warning.
    pub fn id(self) -> &'static str {
        match self {
            Self::ElbowTooShort => "b1adddfc-0221-4d03-b9c4-72dc875735c0",
            Self::ElbowInText => "83906ecb-f179-4d24-9477-b4f25834bbd3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ElbowTooShort => "ELBOW_TOO_SHORT",
            Self::ElbowInText => "ELBOW_IN_TEXT",
        }
    }

    /// User-facing description with the suggested fix.
    pub fn message(self) -> &'static str {
        match self {
            Self::ElbowTooShort => {
                "Generated arrow segment is too short: move elbow or text to a new position."
            }
            Self::ElbowInText => {
                "Generated elbow point lands in the text: move the text to a new position."
            }
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderWarning {
    pub code: WarningCode,
    pub leader_index: usize,
}

impl LeaderWarning {
    pub fn new(code: WarningCode, leader_index: usize) -> Self {
        Self { code, leader_index }
    }
}
