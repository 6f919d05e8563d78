use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const PYTHON_HEADER: &str = "# Auto-generated workout programs from fitness-app";

/// Training tier, derived from the identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Training emphasis, derived from keywords in the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Strength,
    MuscleBuilding,
    WeightLoss,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Goal::Strength => "strength",
            Goal::MuscleBuilding => "muscle_building",
            Goal::WeightLoss => "weight_loss",
        })
    }
}

/// Day label -> exercises, in source order.
pub type Workouts = IndexMap<String, Vec<String>>;

/// One extracted program. Field order here is the field order of the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub name: String,
    pub level: Level,
    pub days: u32,
    pub goal: Goal,
    pub description: String,
    pub focus: String,
    pub workouts: Workouts,
}

/// Keyed by program id, sorted so every run serializes identically.
pub type ProgramSet = BTreeMap<String, ProgramRecord>;

/// Pretty JSON with 2-space indentation. serde_json leaves non-ASCII as-is.
pub fn to_json(programs: &ProgramSet) -> Result<String> {
    let mut out = serde_json::to_string_pretty(programs).context("Failed to serialize programs")?;
    out.push('\n');
    Ok(out)
}

pub fn from_json(json: &str) -> Result<ProgramSet> {
    serde_json::from_str(json).context("Failed to parse programs JSON")
}

pub fn save_json(path: &Path, programs: &ProgramSet) -> Result<()> {
    let json = to_json(programs)?;
    write_file(path, &json)
}

/// Same document wrapped as an importable Python module.
pub fn save_python(path: &Path, programs: &ProgramSet) -> Result<()> {
    let json = to_json(programs)?;
    let module = format!("{}\nWORKOUT_PROGRAMS = {}", PYTHON_HEADER, json);
    write_file(path, &module)
}

pub fn load_json(path: &Path) -> Result<ProgramSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json(&raw)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProgramSet {
        let mut workouts = Workouts::new();
        workouts.insert(
            "Week 1 - Day 1 (Push)".to_string(),
            vec!["Bench Press 3x10".to_string(), "Pushups 2xAMRAP".to_string()],
        );
        workouts.insert("Rest Day".to_string(), Vec::new());
        workouts.insert("Day A".to_string(), vec!["Squat 5x3 @85%".to_string()]);

        let mut set = ProgramSet::new();
        set.insert(
            "BEG_MUSCLE_3DAY".to_string(),
            ProgramRecord {
                name: "Beginner Muscle Building – 3 Day".to_string(),
                level: Level::Beginner,
                days: 3,
                goal: Goal::MuscleBuilding,
                description: "4-week progressive muscle building program".to_string(),
                focus: "Building muscle mass with higher volume".to_string(),
                workouts,
            },
        );
        set
    }

    #[test]
    fn json_field_order_and_indent() {
        let json = to_json(&sample()).unwrap();
        let name = json.find("\"name\"").unwrap();
        let level = json.find("\"level\"").unwrap();
        let days = json.find("\"days\"").unwrap();
        let goal = json.find("\"goal\"").unwrap();
        let desc = json.find("\"description\"").unwrap();
        let focus = json.find("\"focus\"").unwrap();
        let workouts = json.find("\"workouts\"").unwrap();
        assert!(name < level && level < days && days < goal);
        assert!(goal < desc && desc < focus && focus < workouts);
        assert!(json.starts_with("{\n  \"BEG_MUSCLE_3DAY\": {\n    \"name\""));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn json_enum_spelling() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"level\": \"Beginner\""));
        assert!(json.contains("\"goal\": \"muscle_building\""));
    }

    #[test]
    fn json_keeps_non_ascii() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("Building – 3 Day"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn json_empty_day_is_kept() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"Rest Day\": []"));
    }

    #[test]
    fn json_round_trip_keeps_day_order() {
        let original = sample();
        let parsed = from_json(&to_json(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
        let days: Vec<_> = parsed["BEG_MUSCLE_3DAY"].workouts.keys().collect();
        assert_eq!(days, ["Week 1 - Day 1 (Push)", "Rest Day", "Day A"]);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/workout_programs.json");
        save_json(&path, &sample()).unwrap();
        assert_eq!(load_json(&path).unwrap(), sample());
    }

    #[test]
    fn python_module_wraps_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workout_programs.py");
        save_python(&path, &sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "# Auto-generated workout programs from fitness-app\nWORKOUT_PROGRAMS = {\n"
        ));
        let json = text.split_once("WORKOUT_PROGRAMS = ").unwrap().1;
        assert_eq!(from_json(json).unwrap(), sample());
    }
}
