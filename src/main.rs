mod error;
mod parser;
mod settings;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::info;

use settings::Settings;
use store::ProgramSet;

#[derive(Parser)]
#[command(
    name = "workout-programs",
    about = "Extract workout program literals from app source into JSON"
)]
struct Cli {
    /// Signature that marks the start of the program definitions
    #[arg(long, global = true)]
    anchor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract programs and write the JSON artifact
    Extract {
        /// Source file to scan (default: src/App.js)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// JSON output path (default: workout_programs.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the programs as an importable Python module
        #[arg(long)]
        python: Option<PathBuf>,
    },
    /// Extract and print the summary without writing anything
    Check {
        /// Source file to scan (default: src/App.js)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Fail if this previously written artifact differs from a fresh extraction
        #[arg(long)]
        against: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(anchor) = cli.anchor {
        settings.anchor = anchor;
    }

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            python,
        } => {
            if let Some(input) = input {
                settings.input = input;
            }
            if let Some(output) = output {
                settings.output = output;
            }
            extract(&settings, python.as_deref()).map(|_| ())
        }
        Commands::Check { input, against } => {
            if let Some(input) = input {
                settings.input = input;
            }
            let programs = run_extraction(&settings)?;
            print_summary(&programs);
            match against {
                Some(path) => check_artifact(&path, &programs),
                None => Ok(()),
            }
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// Extract and write the artifacts. Nothing is written unless extraction
/// produced at least one program.
fn extract(settings: &Settings, python: Option<&Path>) -> Result<ProgramSet> {
    let programs = run_extraction(settings)?;

    store::save_json(&settings.output, &programs)?;
    println!("[SAVED] Saved to {}", settings.output.display());
    if let Some(path) = python {
        store::save_python(path, &programs)?;
        println!("[SAVED] Saved to {}", path.display());
    }

    print_summary(&programs);
    Ok(programs)
}

/// Read the source and extract. Fails when the anchor is missing or no
/// program survives extraction.
fn run_extraction(settings: &Settings) -> Result<ProgramSet> {
    let locator = settings.locator()?;
    let source = read_source(&settings.input)?;

    println!("Extracting programs from {}...", settings.input.display());
    let extraction = parser::extract_programs(&source, &locator)
        .with_context(|| format!("No programs extracted from {}", settings.input.display()))?;

    info!(
        anchor = locator.anchor(),
        extracted = extraction.programs.len(),
        skipped = extraction.skipped.len(),
        duplicates = extraction.duplicates.len(),
        "extraction finished"
    );
    println!(
        "\n[SUCCESS] Successfully extracted {} programs ({} skipped)",
        extraction.programs.len(),
        extraction.skipped.len()
    );
    Ok(extraction.programs)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Compare a written artifact with the fresh extraction.
fn check_artifact(path: &Path, programs: &ProgramSet) -> Result<()> {
    let written = store::load_json(path)?;
    if &written == programs {
        println!("\n{} is up to date", path.display());
        return Ok(());
    }

    let stale: Vec<&String> = programs
        .keys()
        .chain(written.keys())
        .filter(|id| programs.get(*id) != written.get(*id))
        .sorted()
        .dedup()
        .collect();
    anyhow::bail!(
        "{} is out of date ({} programs differ: {})",
        path.display(),
        stale.len(),
        stale.iter().join(", ")
    )
}

fn print_summary(programs: &ProgramSet) {
    println!("\nPrograms Summary:");
    for (id, p) in programs {
        println!(
            "  {}: {} ({}, {} days, {})",
            id, p.name, p.level, p.days, p.goal
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::parser::locator::{
        Locator, DEFAULT_ANCHOR, DEFAULT_FORWARD, DEFAULT_LOOKBACK, DEFAULT_RECORD_OPENING,
    };
    use tempfile::TempDir;

    fn programs() -> ProgramSet {
        let source = std::fs::read_to_string("tests/fixtures/three_records.js").unwrap();
        parser::extract_programs(&source, &Locator::default())
            .unwrap()
            .programs
    }

    #[test]
    fn artifact_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workout_programs.json");
        store::save_json(&path, &programs()).unwrap();
        assert!(check_artifact(&path, &programs()).is_ok());
    }

    #[test]
    fn artifact_out_of_date_names_programs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workout_programs.json");
        let mut old = programs();
        old.get_mut("INT_MUSCLE_BUILDER").unwrap().days = 3;
        old.remove("ADV_WEIGHT_LOSS_CUT");
        store::save_json(&path, &old).unwrap();

        let err = check_artifact(&path, &programs()).unwrap_err().to_string();
        assert!(err.contains("2 programs differ: ADV_WEIGHT_LOSS_CUT, INT_MUSCLE_BUILDER"));
    }

    fn settings_for(dir: &TempDir, source: &str) -> Settings {
        let input = dir.path().join("App.js");
        std::fs::write(&input, source).unwrap();
        Settings {
            input,
            output: dir.path().join("out/workout_programs.json"),
            anchor: DEFAULT_ANCHOR.to_string(),
            record_opening: DEFAULT_RECORD_OPENING.to_string(),
            lookback_window: DEFAULT_LOOKBACK,
            forward_window: DEFAULT_FORWARD,
        }
    }

    #[test]
    fn extract_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let source = std::fs::read_to_string("tests/fixtures/three_records.js").unwrap();
        let settings = settings_for(&dir, &source);
        let python = dir.path().join("workout_programs.py");

        let programs = extract(&settings, Some(&python)).unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(store::load_json(&settings.output).unwrap(), programs);
        assert!(python.exists());
    }

    #[test]
    fn no_records_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(
            &dir,
            "const assignWorkoutTemplate = () => {\n  return { id: 'BEG_EMPTY', name: 'No days' };\n};",
        );
        let python = dir.path().join("workout_programs.py");

        let err = extract(&settings, Some(&python)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::NoRecords { candidates: 1 })
        ));
        assert!(!settings.output.exists());
        assert!(!python.exists());
    }

    #[test]
    fn missing_anchor_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(&dir, "function other() { return { id: 'BEG_X' }; }");

        let err = extract(&settings, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::AnchorNotFound { .. })
        ));
        assert!(!settings.output.exists());
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = read_source(Path::new("tests/fixtures/does_not_exist.js")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
