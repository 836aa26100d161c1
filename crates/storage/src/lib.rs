use directories::ProjectDirs;
use doc_model::{AnglePreset, Drawing};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PREFS_SCHEMA_VERSION: u32 = 1;
const DRAWING_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported {kind} schema version {found} (expected {expected})")]
    UnsupportedVersion { kind: &'static str, found: u32, expected: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub angle_preset: AnglePreset,
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferencesEnvelope {
    version: u32,
    preferences: Preferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DrawingEnvelope {
    version: u32,
    drawing: Drawing,
}

impl Storage {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "LeaderAdjust", "LeaderAdjust")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_preferences(&self) -> Result<Preferences, StorageError> {
        let path = self.preferences_path();
        if !path.exists() {
            return Ok(Preferences::default());
        }

        let bytes = fs::read(path)?;
        let envelope: PreferencesEnvelope = serde_json::from_slice(&bytes)?;
        check_version("preferences", envelope.version, PREFS_SCHEMA_VERSION)?;

        Ok(envelope.preferences)
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let envelope =
            PreferencesEnvelope { version: PREFS_SCHEMA_VERSION, preferences: *preferences };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        fs::write(self.preferences_path(), bytes)?;
        tracing::debug!(path = %self.preferences_path().display(), "preferences saved");
        Ok(())
    }

    fn preferences_path(&self) -> PathBuf {
        self.root.join("preferences.json")
    }
}

pub fn load_drawing(path: &Path) -> Result<Drawing, StorageError> {
    let bytes = fs::read(path)?;
    let envelope: DrawingEnvelope = serde_json::from_slice(&bytes)?;
    check_version("drawing", envelope.version, DRAWING_SCHEMA_VERSION)?;

    tracing::debug!(path = %path.display(), notes = envelope.drawing.notes.len(), "drawing loaded");
    Ok(envelope.drawing)
}

pub fn save_drawing(path: &Path, drawing: &Drawing) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let envelope = DrawingEnvelope { version: DRAWING_SCHEMA_VERSION, drawing: drawing.clone() };
    let bytes = serde_json::to_vec_pretty(&envelope)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn check_version(kind: &'static str, found: u32, expected: u32) -> Result<(), StorageError> {
    if found != expected {
        return Err(StorageError::UnsupportedVersion { kind, found, expected });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::TextNote;
    use leader_core::{HorizontalAlign, LeaderSegment, Point2D};

    #[test]
    fn preferences_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let prefs = Preferences { angle_preset: AnglePreset::Deg30 };

        store.save_preferences(&prefs).expect("save should succeed");
        let loaded = store.load_preferences().expect("load should succeed");

        assert_eq!(loaded, prefs);
    }

    #[test]
    fn load_defaults_when_file_absent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let loaded = store.load_preferences().expect("load should succeed");
        assert_eq!(loaded, Preferences::default());
        assert_eq!(loaded.angle_preset, AnglePreset::Deg60);
    }

    #[test]
    fn drawing_survives_save_and_load() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("nested").join("drawing.json");

        let mut note = TextNote::new(Point2D::new(1.0, 2.0), 3.0, 0.5, HorizontalAlign::Right);
        note.leaders.push(LeaderSegment::new(Point2D::new(0.0, 3.0), Point2D::new(-1.0, 0.0)));
        let drawing = Drawing { view_scale: 48.0, notes: vec![note] };

        save_drawing(&path, &drawing).expect("save should succeed");
        let loaded = load_drawing(&path).expect("load should succeed");

        assert_eq!(loaded, drawing);
    }

    #[test]
    fn unknown_alignment_loads_and_is_kept() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("drawing.json");
        let json = r#"{
            "version": 1,
            "drawing": {
                "view_scale": 1.0,
                "notes": [{
                    "id": "5f0c3b7e-2a51-4a8e-9d0e-6f1b2c3d4e5f",
                    "position": { "x": 0.0, "y": 0.0 },
                    "width": 1.0,
                    "height": 1.0,
                    "horizontal_align": "justify"
                }]
            }
        }"#;
        fs::write(&path, json).expect("fixture should be written");

        let drawing = load_drawing(&path).expect("load should succeed");
        assert_eq!(
            drawing.notes[0].horizontal_align,
            HorizontalAlign::Unsupported("justify".into())
        );
        assert!(drawing.notes[0].leaders.is_empty());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("drawing.json");
        fs::write(&path, r#"{ "version": 7, "drawing": { "view_scale": 1.0 } }"#)
            .expect("fixture should be written");

        let error = load_drawing(&path).expect_err("version 7 is unknown");
        assert!(matches!(error, StorageError::UnsupportedVersion { found: 7, .. }));
    }
}
