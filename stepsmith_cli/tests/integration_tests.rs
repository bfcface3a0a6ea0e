//! Integration tests for the stepsmith binary.
//!
//! These tests verify end-to-end behavior including:
//! - Workout compilation and emission-plan output
//! - Preview display
//! - Record-stream inspection and validation

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stepsmith"))
}

fn write_workout(dir: &Path) -> PathBuf {
    let workout = serde_json::json!({
        "title": "Engine Builder",
        "settings": {
            "default_rest_type": "timed",
            "default_rest_sec": 60
        },
        "blocks": [
            {
                "structure": "2 rounds",
                "supersets": [
                    {
                        "exercises": [
                            {"name": "500m Row", "reps": "500m"},
                            {"name": "Goblet Squat", "reps": 12}
                        ],
                        "rest_sec": 90,
                        "rest_type": "timed"
                    }
                ]
            },
            {
                "exercises": [
                    {"name": "Plank", "duration_sec": 60, "sets": 3}
                ]
            }
        ]
    });
    let path = dir.join("workout.json");
    fs::write(&path, serde_json::to_string_pretty(&workout).unwrap()).unwrap();
    path
}

fn write_records(dir: &Path) -> PathBuf {
    let records = serde_json::json!([
        {"record": "file_meta", "manufacturer": "development", "created": "2024-03-01 08:00:00"},
        {"record": "workout_meta", "name": "Intervals", "sport": "training", "sub_sport": "cardio_training"},
        {"record": "title", "category_id": 28, "exercise_id": 0, "name": "Air Squat"},
        {"record": "step", "category_id": 28, "exercise_id": 0, "reps": 10, "intensity": "active"},
        {"record": "step", "duration_sec": 60.0, "intensity": "rest"},
        {"record": "step", "repeat_count": 2, "target_step": 0}
    ]);
    let path = dir.join("records.json");
    fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
    path
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout step compiler for device export",
        ));
}

#[test]
fn test_build_writes_emission_plan() {
    let temp_dir = setup_test_dir();
    let workout_path = write_workout(temp_dir.path());
    let plan_path = temp_dir.path().join("plan.json");

    cli()
        .arg("build")
        .arg(&workout_path)
        .arg("--out")
        .arg(&plan_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Engine Builder"))
        .stdout(predicate::str::contains("Emission plan written"));

    let plan: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(plan["title"], "Engine Builder");
    assert_eq!(plan["sport"], "training");
    assert_eq!(plan["sub_sport"], "cardio_training");
    assert!(plan["steps"].as_array().unwrap().len() > 4);
    assert!(!plan["titles"].as_array().unwrap().is_empty());
}

#[test]
fn test_build_default_output_path() {
    let temp_dir = setup_test_dir();
    let workout_path = write_workout(temp_dir.path());

    cli().arg("build").arg(&workout_path).assert().success();

    assert!(temp_dir.path().join("workout.plan.json").exists());
}

#[test]
fn test_build_rejects_workout_without_exercises() {
    let temp_dir = setup_test_dir();
    let workout_path = temp_dir.path().join("empty.json");
    fs::write(&workout_path, r#"{"title": "Nothing", "blocks": []}"#).unwrap();

    cli()
        .arg("build")
        .arg(&workout_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptyWorkout"));
}

#[test]
fn test_build_with_forced_sport() {
    let temp_dir = setup_test_dir();
    let workout_path = write_workout(temp_dir.path());
    let plan_path = temp_dir.path().join("plan.json");

    cli()
        .arg("build")
        .arg(&workout_path)
        .arg("--out")
        .arg(&plan_path)
        .arg("--sport")
        .arg("strength")
        .assert()
        .success()
        .stdout(predicate::str::contains("strength"));

    let plan: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(plan["sub_sport"], "strength_training");
}

#[test]
fn test_preview_lists_steps() {
    let temp_dir = setup_test_dir();
    let workout_path = write_workout(temp_dir.path());

    cli()
        .arg("preview")
        .arg(&workout_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Goblet Squat"))
        .stdout(predicate::str::contains("500m"))
        .stdout(predicate::str::contains("Repeat"));
}

#[test]
fn test_preview_lap_button_mode() {
    let temp_dir = setup_test_dir();
    let workout_path = write_workout(temp_dir.path());

    cli()
        .arg("preview")
        .arg(&workout_path)
        .arg("--lap-button")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lap Button"));
}

#[test]
fn test_lap_button_from_config_file() {
    let temp_dir = setup_test_dir();
    let workout_path = write_workout(temp_dir.path());
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[export]\nuse_lap_button = true\n").unwrap();

    cli()
        .arg("preview")
        .arg(&workout_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Lap Button"));
}

#[test]
fn test_inspect_reconstructs_workout() {
    let temp_dir = setup_test_dir();
    let records_path = write_records(temp_dir.path());

    cli()
        .arg("inspect")
        .arg(&records_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Intervals"))
        .stdout(predicate::str::contains("Air Squat"))
        .stdout(predicate::str::contains("3 sets"));
}

#[test]
fn test_inspect_rejects_unreadable_stream() {
    let temp_dir = setup_test_dir();
    let records_path = temp_dir.path().join("garbage.json");
    fs::write(&records_path, "definitely not records").unwrap();

    cli()
        .arg("inspect")
        .arg(&records_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decode"));
}

#[test]
fn test_inspect_flags_invalid_categories() {
    let temp_dir = setup_test_dir();
    let records = serde_json::json!([
        {"record": "step", "name": "Mystery Move", "category_id": 45, "intensity": "active"}
    ]);
    let records_path = temp_dir.path().join("records.json");
    fs::write(&records_path, serde_json::to_string(&records).unwrap()).unwrap();

    cli()
        .arg("inspect")
        .arg(&records_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid exercise category 45"));
}
