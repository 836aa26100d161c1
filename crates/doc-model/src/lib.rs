use leader_core::{
    process, HorizontalAlign, LeaderError, LeaderSegment, LeaderWarning, Point2D, TextBlock,
    ThresholdConfig,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type NoteId = uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnglePreset {
    #[serde(rename = "30_degrees")]
    Deg30,
    #[serde(rename = "45_degrees")]
    Deg45,
    #[default]
    #[serde(rename = "60_degrees")]
    Deg60,
}

impl AnglePreset {
    pub const ALL: [AnglePreset; 3] = [AnglePreset::Deg60, AnglePreset::Deg45, AnglePreset::Deg30];

    pub fn degrees(self) -> f64 {
        match self {
            Self::Deg30 => 30.0,
            Self::Deg45 => 45.0,
            Self::Deg60 => 60.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Deg30 => "Leader Angle: 30 degrees",
            Self::Deg45 => "Leader Angle: 45 degrees",
            Self::Deg60 => "Leader Angle: 60 degrees",
        }
    }
}

impl fmt::Display for AnglePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown angle preset `{0}` (expected 30, 45 or 60)")]
pub struct ParsePresetError(String);

impl FromStr for AnglePreset {
    type Err = ParsePresetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "30" | "30_degrees" => Ok(Self::Deg30),
            "45" | "45_degrees" => Ok(Self::Deg45),
            "60" | "60_degrees" => Ok(Self::Deg60),
            other => Err(ParsePresetError(other.to_owned())),
        }
    }
}

/// A text note with its leaders, as stored in a drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNote {
    pub id: NoteId,
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
    pub horizontal_align: HorizontalAlign,
    /// Gap between text and leader attachment, in sheet units
    #[serde(default)]
    pub leader_offset: f64,
    #[serde(default)]
    pub leaders: Vec<LeaderSegment>,
}

impl TextNote {
    pub fn new(position: Point2D, width: f64, height: f64, align: HorizontalAlign) -> Self {
        Self {
            id: NoteId::new_v4(),
            position,
            width,
            height,
            horizontal_align: align,
            leader_offset: 0.0,
            leaders: Vec::new(),
        }
    }

    pub fn text_block(&self, view_scale: f64) -> TextBlock {
        TextBlock {
            position: self.position,
            width: self.width,
            height: self.height,
            horizontal_align: self.horizontal_align.clone(),
            padding: self.leader_offset * view_scale,
            leaders: self.leaders.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub view_scale: f64,
    #[serde(default)]
    pub notes: Vec<TextNote>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self { view_scale: 1.0, notes: Vec::new() }
    }
}

impl Drawing {
    pub fn note(&self, id: NoteId) -> Option<&TextNote> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut TextNote> {
        self.notes.iter_mut().find(|note| note.id == id)
    }

    pub fn note_ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|note| note.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("text note {0} not found")]
    NoteNotFound(NoteId),
    #[error("custom angle {0} must lie strictly between 0 and 90 degrees")]
    InvalidCustomAngle(f64),
    #[error("failed to adjust leaders of note {note_id}")]
    Leader {
        note_id: NoteId,
        #[source]
        source: LeaderError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleSelection {
    Preset(AnglePreset),
    Custom(f64),
}

impl Default for AngleSelection {
    fn default() -> Self {
        Self::Preset(AnglePreset::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub drawing: Drawing,
    pub angle: AngleSelection,
    pub thresholds: ThresholdConfig,
}

impl SessionState {
    pub fn new(drawing: Drawing) -> Self {
        Self { drawing, angle: AngleSelection::default(), thresholds: ThresholdConfig::default() }
    }

    pub fn angle_degrees(&self) -> f64 {
        match self.angle {
            AngleSelection::Preset(preset) => preset.degrees(),
            AngleSelection::Custom(degrees) => degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SelectPreset { preset: AnglePreset },
    SetCustomAngle { degrees: f64 },
    AdjustNote { note_id: NoteId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustOutcome {
    pub note_id: NoteId,
    pub angle_degrees: f64,
    pub committed: usize,
    pub warnings: Vec<LeaderWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    AngleChanged { degrees: f64 },
    Adjusted(AdjustOutcome),
}

pub fn apply_session_action(
    state: &mut SessionState,
    action: SessionAction,
) -> Result<ActionOutcome, SessionError> {
    match action {
        SessionAction::SelectPreset { preset } => {
            state.angle = AngleSelection::Preset(preset);
            Ok(ActionOutcome::AngleChanged { degrees: preset.degrees() })
        }
        SessionAction::SetCustomAngle { degrees } => {
            if !degrees.is_finite() || degrees <= 0.0 || degrees >= 90.0 {
                return Err(SessionError::InvalidCustomAngle(degrees));
            }
            state.angle = AngleSelection::Custom(degrees);
            Ok(ActionOutcome::AngleChanged { degrees })
        }
        SessionAction::AdjustNote { note_id } => {
            adjust_note(state, note_id).map(ActionOutcome::Adjusted)
        }
    }
}

fn adjust_note(state: &mut SessionState, note_id: NoteId) -> Result<AdjustOutcome, SessionError> {
    // Read the angle per note so a preset change between notes is honored.
    let angle_degrees = state.angle_degrees();
    let view_scale = state.drawing.view_scale;

    let note = state.drawing.note(note_id).ok_or(SessionError::NoteNotFound(note_id))?;
    let report =
        process(&note.text_block(view_scale), angle_degrees, view_scale, &state.thresholds)
            .map_err(|source| SessionError::Leader { note_id, source })?;

    let note = state.drawing.note_mut(note_id).ok_or(SessionError::NoteNotFound(note_id))?;
    note.leaders = report.leaders;

    tracing::info!(
        %note_id,
        angle_degrees,
        committed = report.committed,
        warnings = report.warnings.len(),
        "leaders adjusted"
    );

    Ok(AdjustOutcome {
        note_id,
        angle_degrees,
        committed: report.committed,
        warnings: report.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leader_core::WarningCode;

    fn note_with_leaders(align: HorizontalAlign, leaders: Vec<LeaderSegment>) -> TextNote {
        let mut note = TextNote::new(Point2D::new(10.0, 10.0), 4.0, 1.0, align);
        note.leaders = leaders;
        note
    }

    fn session(notes: Vec<TextNote>) -> SessionState {
        SessionState::new(Drawing { view_scale: 1.0, notes })
    }

    #[test]
    fn default_preset_is_sixty_degrees() {
        let state = session(Vec::new());
        assert_eq!(state.angle_degrees(), 60.0);
    }

    #[test]
    fn presets_parse_from_degrees_and_names() {
        assert_eq!("45".parse::<AnglePreset>(), Ok(AnglePreset::Deg45));
        assert_eq!("30_degrees".parse::<AnglePreset>(), Ok(AnglePreset::Deg30));
        assert!("50".parse::<AnglePreset>().is_err());
    }

    #[test]
    fn preset_serializes_with_degree_suffix() {
        let json = serde_json::to_string(&AnglePreset::Deg45).expect("preset should serialize");
        assert_eq!(json, "\"45_degrees\"");
    }

    #[test]
    fn adjusting_commits_accepted_leaders() {
        let note = note_with_leaders(
            HorizontalAlign::Left,
            vec![LeaderSegment::new(Point2D::new(3.0, 2.0), Point2D::new(0.0, 0.0))],
        );
        let note_id = note.id;
        let mut state = session(vec![note]);

        apply_session_action(&mut state, SessionAction::SelectPreset { preset: AnglePreset::Deg45 })
            .expect("preset change should succeed");
        let outcome = apply_session_action(&mut state, SessionAction::AdjustNote { note_id })
            .expect("adjust should succeed");

        let ActionOutcome::Adjusted(outcome) = outcome else {
            panic!("expected an adjust outcome");
        };
        assert_eq!(outcome.committed, 1);
        assert_eq!(outcome.angle_degrees, 45.0);

        let elbow = state.drawing.note(note_id).expect("note exists").leaders[0].elbow;
        assert!((elbow.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn preset_change_between_notes_is_picked_up() {
        let leader = LeaderSegment::new(Point2D::new(3.0, 2.0), Point2D::new(0.0, 0.0));
        let first = note_with_leaders(HorizontalAlign::Left, vec![leader]);
        let second = note_with_leaders(HorizontalAlign::Left, vec![leader]);
        let (first_id, second_id) = (first.id, second.id);
        let mut state = session(vec![first, second]);

        apply_session_action(&mut state, SessionAction::AdjustNote { note_id: first_id })
            .expect("adjust should succeed");
        apply_session_action(&mut state, SessionAction::SetCustomAngle { degrees: 45.0 })
            .expect("angle change should succeed");
        apply_session_action(&mut state, SessionAction::AdjustNote { note_id: second_id })
            .expect("adjust should succeed");

        let first_elbow = state.drawing.note(first_id).expect("note exists").leaders[0].elbow;
        let second_elbow = state.drawing.note(second_id).expect("note exists").leaders[0].elbow;
        assert!((first_elbow.x - 2.0 / 60f64.to_radians().tan()).abs() < 1e-9);
        assert!((second_elbow.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_alignment_leaves_drawing_unchanged() {
        let note = note_with_leaders(
            HorizontalAlign::Unsupported("justify".into()),
            vec![LeaderSegment::new(Point2D::new(3.0, 2.0), Point2D::new(0.0, 0.0))],
        );
        let note_id = note.id;
        let mut state = session(vec![note]);
        let before = state.drawing.clone();

        let error = apply_session_action(&mut state, SessionAction::AdjustNote { note_id })
            .expect_err("alignment should be rejected");

        assert!(matches!(error, SessionError::Leader { .. }));
        assert_eq!(state.drawing, before);
    }

    #[test]
    fn warnings_coexist_with_commits() {
        let note = note_with_leaders(
            HorizontalAlign::Left,
            vec![
                LeaderSegment::new(Point2D::new(0.001, 0.001), Point2D::new(0.0, 0.0)),
                LeaderSegment::new(Point2D::new(-3.0, -2.0), Point2D::new(0.0, 0.0)),
            ],
        );
        let note_id = note.id;
        let mut state = session(vec![note]);

        let ActionOutcome::Adjusted(outcome) =
            apply_session_action(&mut state, SessionAction::AdjustNote { note_id })
                .expect("adjust should succeed")
        else {
            panic!("expected an adjust outcome");
        };

        assert_eq!(outcome.warnings, vec![LeaderWarning::new(WarningCode::ElbowTooShort, 0)]);
        assert_eq!(outcome.committed, 1);
    }

    #[test]
    fn missing_note_is_reported() {
        let mut state = session(Vec::new());
        let note_id = NoteId::new_v4();

        let error = apply_session_action(&mut state, SessionAction::AdjustNote { note_id })
            .expect_err("note does not exist");

        assert_eq!(error, SessionError::NoteNotFound(note_id));
    }

    #[test]
    fn custom_angle_is_validated() {
        let mut state = session(Vec::new());
        let error =
            apply_session_action(&mut state, SessionAction::SetCustomAngle { degrees: 95.0 })
                .expect_err("angle out of range");

        assert_eq!(error, SessionError::InvalidCustomAngle(95.0));
        assert_eq!(state.angle, AngleSelection::Preset(AnglePreset::Deg60));
    }

    #[test]
    fn leader_offset_is_scaled_into_padding() {
        let mut note = TextNote::new(Point2D::new(0.0, 0.0), 1.0, 0.1, HorizontalAlign::Left);
        note.leader_offset = 0.01;

        let block = note.text_block(48.0);
        assert!((block.padding - 0.48).abs() < 1e-12);
    }
}
