use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_model::{
    apply_session_action, ActionOutcome, AdjustOutcome, AnglePreset, NoteId, SessionAction,
    SessionState,
};
use leader_core::{BoundingRect, ThresholdConfig};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use storage::{Preferences, Storage};

const DATA_DIR_ENV: &str = "LEADER_ADJUST_DATA_DIR";

#[derive(Debug, Parser)]
#[command(name = "leader-adjust")]
#[command(about = "Set text note leaders to a fixed elbow angle")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Adjust the leaders of text notes in a drawing.
    Adjust {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Note to adjust; repeat to adjust several in order. Defaults to every note.
        #[arg(long = "note", value_name = "ID")]
        notes: Vec<NoteId>,
        /// Angle preset (30, 45 or 60). Defaults to the stored preference.
        #[arg(long, conflicts_with = "angle")]
        preset: Option<AnglePreset>,
        /// Custom angle in degrees, strictly between 0 and 90.
        #[arg(long)]
        angle: Option<f64>,
        #[arg(long)]
        min_leader_length: Option<f64>,
        #[arg(long)]
        min_delta_y: Option<f64>,
        /// Where to write the adjusted drawing. Defaults to FILE.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print a machine-readable report.
        #[arg(long)]
        json: bool,
    },
    /// Print the text bounding rectangle of a note.
    Bounds {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "ID")]
        note: NoteId,
    },
    /// List angle presets.
    Presets,
    /// Store the default angle preset.
    SetPreset {
        #[arg(value_name = "PRESET")]
        preset: AnglePreset,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug)]
struct AdjustArgs {
    file: PathBuf,
    notes: Vec<NoteId>,
    preset: Option<AnglePreset>,
    angle: Option<f64>,
    thresholds: ThresholdConfig,
    output: Option<PathBuf>,
    json: bool,
}

#[derive(Debug, Serialize)]
struct AdjustReport<'a> {
    output: String,
    angle_degrees: f64,
    notes: &'a [AdjustOutcome],
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Adjust {
            file,
            notes,
            preset,
            angle,
            min_leader_length,
            min_delta_y,
            output,
            json,
        } => {
            let defaults = ThresholdConfig::default();
            let thresholds = ThresholdConfig {
                min_leader_length: min_leader_length.unwrap_or(defaults.min_leader_length),
                min_delta_y: min_delta_y.unwrap_or(defaults.min_delta_y),
            };
            run_adjust(AdjustArgs { file, notes, preset, angle, thresholds, output, json })
        }
        Commands::Bounds { file, note } => run_bounds(&file, note),
        Commands::Presets => run_presets(),
        Commands::SetPreset { preset } => run_set_preset(preset),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_adjust(args: AdjustArgs) -> Result<()> {
    ensure_drawing_exists(&args.file)?;

    let drawing = storage::load_drawing(&args.file)
        .with_context(|| format!("failed to load drawing {}", args.file.display()))?;

    let mut state = SessionState::new(drawing);
    state.thresholds = args.thresholds;

    let angle_action = match (args.angle, args.preset) {
        (Some(degrees), _) => SessionAction::SetCustomAngle { degrees },
        (None, Some(preset)) => SessionAction::SelectPreset { preset },
        (None, None) => {
            let preset = open_storage()?.load_preferences()?.angle_preset;
            SessionAction::SelectPreset { preset }
        }
    };
    apply_session_action(&mut state, angle_action)?;

    let note_ids = if args.notes.is_empty() { state.drawing.note_ids() } else { args.notes };
    tracing::debug!(notes = note_ids.len(), angle = state.angle_degrees(), "adjusting notes");

    let mut outcomes = Vec::new();
    let mut failure = None;
    for note_id in note_ids {
        match apply_session_action(&mut state, SessionAction::AdjustNote { note_id }) {
            Ok(ActionOutcome::Adjusted(outcome)) => outcomes.push(outcome),
            Ok(ActionOutcome::AngleChanged { .. }) => {}
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }

    // Notes adjusted before a failure stay committed.
    let output = args.output.unwrap_or(args.file);
    storage::save_drawing(&output, &state.drawing)
        .with_context(|| format!("failed to write drawing to {}", output.display()))?;

    if args.json {
        let report = AdjustReport {
            output: output.display().to_string(),
            angle_degrees: state.angle_degrees(),
            notes: &outcomes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome);
        }
    }

    if let Some(error) = failure {
        return Err(anyhow::Error::new(error).context("leader adjustment stopped"));
    }

    Ok(())
}

fn print_outcome(outcome: &AdjustOutcome) {
    let total = outcome.committed + outcome.warnings.len();
    println!(
        "note {}: {} of {} leaders adjusted at {} degrees",
        outcome.note_id, outcome.committed, total, outcome.angle_degrees
    );

    for warning in &outcome.warnings {
        println!(
            "  leader {}: {} - {}",
            warning.leader_index,
            warning.code,
            warning.code.message()
        );
    }
}

fn run_bounds(file: &Path, note_id: NoteId) -> Result<()> {
    ensure_drawing_exists(file)?;

    let drawing = storage::load_drawing(file)
        .with_context(|| format!("failed to load drawing {}", file.display()))?;
    let note = drawing.note(note_id).ok_or(doc_model::SessionError::NoteNotFound(note_id))?;

    let bounds: BoundingRect = note.text_block(drawing.view_scale).bounds(drawing.view_scale)?;
    println!("{}", serde_json::to_string_pretty(&bounds)?);

    Ok(())
}

fn run_presets() -> Result<()> {
    let Preferences { angle_preset: current } = open_storage()?.load_preferences()?;

    for preset in AnglePreset::ALL {
        let marker = if preset == current { '*' } else { ' ' };
        println!("{marker} {:>2}  {}", preset.degrees(), preset.label());
    }

    Ok(())
}

fn run_set_preset(preset: AnglePreset) -> Result<()> {
    let store = open_storage()?;
    store
        .save_preferences(&Preferences { angle_preset: preset })
        .with_context(|| format!("failed to save preferences in {}", store.root().display()))?;

    println!("angle preset set to {preset} degrees");
    Ok(())
}

fn open_storage() -> Result<Storage> {
    if let Some(root) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(Storage::with_root(PathBuf::from(root)));
    }

    Storage::from_default_project().context("failed to locate preferences directory")
}

fn ensure_drawing_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
