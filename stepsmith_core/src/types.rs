//! Core domain types for the stepsmith workout compiler.
//!
//! This module defines the fundamental types used throughout the system:
//! - The workout input tree (blocks, supersets, exercises, settings)
//! - Rest and warm-up descriptors
//! - The compiled step model emitted by the compiler

use serde::{Deserialize, Serialize};

// ============================================================================
// Rest and Warm-Up Descriptors
// ============================================================================

/// How a rest period completes: countdown timer or lap-button press
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestType {
    Timed,
    Button,
}

/// Warm-up activity kinds recognized for display purposes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarmupActivity {
    Stretching,
    JumpRope,
    AirBike,
    Treadmill,
    Stairmaster,
    Rowing,
    Custom,
}

impl WarmupActivity {
    /// Display name shown on the device for this activity
    pub fn label(self) -> &'static str {
        match self {
            WarmupActivity::Stretching => "Stretching",
            WarmupActivity::JumpRope => "Jump Rope",
            WarmupActivity::AirBike => "Air Bike",
            WarmupActivity::Treadmill => "Treadmill",
            WarmupActivity::Stairmaster => "Stairmaster",
            WarmupActivity::Rowing => "Rowing",
            WarmupActivity::Custom => "Warm-Up",
        }
    }
}

/// A warm-up descriptor: what to do and for how long.
///
/// A missing duration means the warm-up runs until the lap button is pressed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WarmupSpec {
    #[serde(default)]
    pub activity: Option<WarmupActivity>,
    #[serde(default)]
    pub duration_sec: Option<u32>,
}

// ============================================================================
// Workout Input Tree
// ============================================================================

/// Workout-level defaults applied when nothing more specific is configured
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSettings {
    #[serde(default = "default_rest_type")]
    pub default_rest_type: RestType,
    #[serde(default)]
    pub default_rest_sec: Option<u32>,
    /// Workout-level warm-up, performed before the first block
    #[serde(default)]
    pub warmup: Option<WarmupSpec>,
}

fn default_rest_type() -> RestType {
    RestType::Button
}

impl Default for WorkoutSettings {
    fn default() -> Self {
        Self {
            default_rest_type: RestType::Button,
            default_rest_sec: None,
            warmup: None,
        }
    }
}

/// Root workout description, immutable once compilation starts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub settings: WorkoutSettings,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_title() -> String {
    "Workout".into()
}

/// Block-level rest override; only consulted when `enabled` is set
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RestOverride {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rest_type: Option<RestType>,
    #[serde(default)]
    pub rest_sec: Option<u32>,
}

/// A named segment of a workout, optionally repeated for a round count
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Free-text structure label, e.g. "3 rounds"; round count parsed from it
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub rest_override: Option<RestOverride>,
    /// Rest inserted after the block, unless it is the final block
    #[serde(default)]
    pub rest_after_sec: Option<u32>,
    #[serde(default)]
    pub supersets: Vec<Superset>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub warmup: Option<WarmupSpec>,
}

/// Exercises performed back-to-back before any rest, as one repeatable unit.
///
/// Per-exercise `sets` fields inside a superset are ignored for repetition;
/// only the block's round count governs how often the sequence repeats.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Superset {
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub rest_sec: Option<u32>,
    #[serde(default)]
    pub rest_type: Option<RestType>,
}

/// A rep prescription: a plain count or free text such as "6-8" or "500m"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Text(String),
}

/// A single exercise as authored
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    #[serde(default = "default_exercise_name")]
    pub name: String,
    #[serde(default)]
    pub reps: Option<Reps>,
    /// Textual rep range such as "6-8"; the upper bound is used
    #[serde(default)]
    pub reps_range: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<u32>,
    #[serde(default)]
    pub distance_m: Option<f64>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub rest_type: Option<RestType>,
    #[serde(default)]
    pub rest_sec: Option<u32>,
    #[serde(default)]
    pub warmup_sets: Option<u32>,
    #[serde(default)]
    pub warmup_reps: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_exercise_name() -> String {
    "Exercise".into()
}

impl Default for Exercise {
    fn default() -> Self {
        Self {
            name: default_exercise_name(),
            reps: None,
            reps_range: None,
            duration_sec: None,
            distance_m: None,
            sets: None,
            rest_type: None,
            rest_sec: None,
            warmup_sets: None,
            warmup_reps: None,
            notes: None,
        }
    }
}

// ============================================================================
// Compiled Step Model
// ============================================================================

/// Step intensity as encoded for the device
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Active,
    Warmup,
}

/// How a compiled step completes.
///
/// Time is in seconds and distance in meters; wire-unit conversion is the
/// encoding collaborator's concern.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StepDuration {
    Reps(u32),
    Time(u32),
    Distance(f64),
    /// Runs until the lap button is pressed
    Open,
}

/// A compiled exercise step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseStep {
    pub display_name: String,
    pub original_name: String,
    pub category_id: u8,
    pub intensity: Intensity,
    pub duration: StepDuration,
    pub sets: u32,
    #[serde(default)]
    pub notes: Option<String>,
    /// Per-category exercise id used for title records; the device movement
    /// id when the resolver knows one, else sequentially assigned
    #[serde(default)]
    pub movement_id: Option<u16>,
}

/// One step of the linear program emitted by the compiler.
///
/// A `Repeat` step is a back-reference: replay the range starting at
/// `target_index` through the step immediately preceding the marker,
/// `repeat_count` times in total including the first execution.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompiledStep {
    Exercise(ExerciseStep),
    Rest {
        rest_type: RestType,
        seconds: u32,
    },
    Warmup {
        display_name: String,
        duration: StepDuration,
    },
    Repeat {
        target_index: usize,
        repeat_count: u32,
    },
}

impl CompiledStep {
    pub fn is_exercise(&self) -> bool {
        matches!(self, CompiledStep::Exercise(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, CompiledStep::Rest { .. })
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self, CompiledStep::Repeat { .. })
    }

    pub fn as_exercise(&self) -> Option<&ExerciseStep> {
        match self {
            CompiledStep::Exercise(step) => Some(step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_deserializes_with_defaults() {
        let workout: Workout = serde_json::from_str("{}").unwrap();
        assert_eq!(workout.title, "Workout");
        assert_eq!(workout.settings.default_rest_type, RestType::Button);
        assert!(workout.blocks.is_empty());
    }

    #[test]
    fn test_exercise_name_defaults() {
        let exercise: Exercise = serde_json::from_str("{}").unwrap();
        assert_eq!(exercise.name, "Exercise");
        assert!(exercise.reps.is_none());
    }

    #[test]
    fn test_reps_accepts_count_and_text() {
        let count: Reps = serde_json::from_str("12").unwrap();
        assert_eq!(count, Reps::Count(12));

        let text: Reps = serde_json::from_str("\"500m\"").unwrap();
        assert_eq!(text, Reps::Text("500m".into()));
    }

    #[test]
    fn test_compiled_step_serde_tagging() {
        let step = CompiledStep::Rest {
            rest_type: RestType::Timed,
            seconds: 30,
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"type\":\"rest\""));

        let back: CompiledStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_warmup_activity_labels() {
        assert_eq!(WarmupActivity::JumpRope.label(), "Jump Rope");
        assert_eq!(WarmupActivity::Custom.label(), "Warm-Up");
    }
}
