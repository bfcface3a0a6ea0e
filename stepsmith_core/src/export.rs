//! Export shaping: one compiled step list, two outputs.
//!
//! The emission plan is what the wire-encoding collaborator consumes; the
//! preview mirrors it for the UI. Both are produced from the same
//! compilation pass so they cannot diverge.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compiler::{compile, CompileOptions, CompiledProgram, TitleEntry};
use crate::error::Result;
use crate::resolver::CategoryResolver;
use crate::sport::{self, ForcedSport, Sport, SportClassification, SubSport};
use crate::taxonomy::category_label;
use crate::types::{CompiledStep, Intensity, RestType, StepDuration, Workout};

/// Wire-format limit for name fields
pub const WIRE_NAME_LIMIT: usize = 50;
/// Wire-format limit for step notes
pub const WIRE_NOTES_LIMIT: usize = 255;

/// Export switches
#[derive(Clone, Copy, Debug, Default)]
pub struct ExportOptions {
    /// Force every exercise to open/button completion
    pub use_lap_button: bool,
    /// Bypass sport detection with a fixed classification
    pub forced_sport: Option<ForcedSport>,
    /// Stamp for the emitted artifact's creation time
    pub time_created: Option<DateTime<Utc>>,
}

/// Everything the wire-encoding collaborator needs to emit the artifact.
///
/// Values are semantic (seconds, meters); field widths, unit conversion and
/// checksums are the collaborator's concern.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EmissionPlan {
    pub title: String,
    pub sport: Sport,
    pub sub_sport: SubSport,
    /// Steps excluding repeat markers
    pub num_valid_steps: u32,
    pub time_created: Option<DateTime<Utc>>,
    pub titles: Vec<TitleEntry>,
    pub steps: Vec<CompiledStep>,
}

/// One preview row mirroring a compiled step
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewStep {
    Exercise {
        display_name: String,
        original_name: String,
        category_id: u8,
        category_label: String,
        duration_display: String,
        sets: u32,
        intensity: Intensity,
        is_warmup_set: bool,
    },
    Rest {
        seconds: u32,
        button: bool,
        duration_display: String,
    },
    Warmup {
        display_name: String,
        duration_display: String,
    },
    Repeat {
        target_index: usize,
        repeat_count: u32,
    },
}

/// Workout summary for the preview pane
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PreviewSummary {
    pub title: String,
    pub sport_name: &'static str,
    pub exercise_count: u32,
    pub rest_count: u32,
    pub total_sets: u32,
    pub has_running: bool,
    pub has_cardio: bool,
    pub has_strength: bool,
    pub warnings: Vec<String>,
    pub steps: Vec<PreviewStep>,
}

/// The paired outputs of one export
#[derive(Clone, Debug)]
pub struct ExportBundle {
    pub plan: EmissionPlan,
    pub preview: PreviewSummary,
}

/// Compile a workout and shape both export outputs from the result.
pub fn export(
    workout: &Workout,
    resolver: &CategoryResolver,
    options: &ExportOptions,
) -> Result<ExportBundle> {
    let program = compile(
        workout,
        resolver,
        &CompileOptions {
            use_lap_button: options.use_lap_button,
        },
    )?;

    let classification = match options.forced_sport {
        Some(forced) => SportClassification::forced(forced),
        None => sport::classify(&program.categories),
    };

    let plan = build_plan(&workout.title, &program, &classification, options);
    let preview = build_preview(&workout.title, &program, &classification);

    tracing::info!(
        title = %plan.title,
        sport = classification.name,
        steps = plan.steps.len(),
        "export shaped"
    );

    Ok(ExportBundle { plan, preview })
}

/// Preview without caring about the emission plan
pub fn preview(
    workout: &Workout,
    resolver: &CategoryResolver,
    options: &ExportOptions,
) -> Result<PreviewSummary> {
    export(workout, resolver, options).map(|bundle| bundle.preview)
}

fn build_plan(
    title: &str,
    program: &CompiledProgram,
    classification: &SportClassification,
    options: &ExportOptions,
) -> EmissionPlan {
    let steps: Vec<CompiledStep> = program
        .steps
        .iter()
        .map(|step| match step {
            CompiledStep::Exercise(e) => {
                let mut e = e.clone();
                e.display_name = truncate(&e.display_name, WIRE_NAME_LIMIT);
                e.notes = e.notes.as_deref().map(|n| truncate(n, WIRE_NOTES_LIMIT));
                CompiledStep::Exercise(e)
            }
            CompiledStep::Warmup {
                display_name,
                duration,
            } => CompiledStep::Warmup {
                display_name: truncate(display_name, WIRE_NAME_LIMIT),
                duration: duration.clone(),
            },
            other => other.clone(),
        })
        .collect();

    let titles = program
        .titles
        .entries()
        .iter()
        .map(|entry| TitleEntry {
            category_id: entry.category_id,
            exercise_id: entry.exercise_id,
            display_name: truncate(&entry.display_name, WIRE_NAME_LIMIT),
        })
        .collect();

    let num_valid_steps = steps.iter().filter(|s| !s.is_repeat()).count() as u32;

    EmissionPlan {
        title: truncate(title, WIRE_NAME_LIMIT),
        sport: classification.sport,
        sub_sport: classification.sub_sport,
        num_valid_steps,
        time_created: options.time_created,
        titles,
        steps,
    }
}

fn build_preview(
    title: &str,
    program: &CompiledProgram,
    classification: &SportClassification,
) -> PreviewSummary {
    let steps: Vec<PreviewStep> = program.steps.iter().map(preview_step).collect();

    let exercise_steps: Vec<_> = program
        .steps
        .iter()
        .filter_map(CompiledStep::as_exercise)
        .collect();
    let exercise_count = exercise_steps.len() as u32;
    let total_sets = exercise_steps.iter().map(|e| e.sets).sum();
    let rest_count = program.steps.iter().filter(|s| s.is_rest()).count() as u32;

    let has_running = program
        .categories
        .iter()
        .any(|c| sport::is_running_category(*c));
    let has_cardio = program
        .categories
        .iter()
        .any(|c| sport::is_cardio_machine_category(*c));
    let has_strength = program
        .categories
        .iter()
        .any(|c| !sport::is_running_category(*c) && !sport::is_cardio_machine_category(*c));

    PreviewSummary {
        title: title.to_string(),
        sport_name: classification.name,
        exercise_count,
        rest_count,
        total_sets,
        has_running,
        has_cardio,
        has_strength,
        warnings: classification.warnings.clone(),
        steps,
    }
}

fn preview_step(step: &CompiledStep) -> PreviewStep {
    match step {
        CompiledStep::Exercise(e) => PreviewStep::Exercise {
            display_name: e.display_name.clone(),
            original_name: e.original_name.clone(),
            category_id: e.category_id,
            category_label: category_label(e.category_id).to_string(),
            duration_display: exercise_duration_display(&e.duration),
            sets: e.sets,
            intensity: e.intensity,
            is_warmup_set: e.intensity == Intensity::Warmup,
        },
        CompiledStep::Rest { rest_type, seconds } => {
            let button = *rest_type == RestType::Button || *seconds == 0;
            PreviewStep::Rest {
                seconds: *seconds,
                button,
                duration_display: if button {
                    "Press Lap".into()
                } else {
                    format!("{seconds}s")
                },
            }
        }
        CompiledStep::Warmup {
            display_name,
            duration,
        } => PreviewStep::Warmup {
            display_name: display_name.clone(),
            duration_display: warmup_duration_display(duration),
        },
        CompiledStep::Repeat {
            target_index,
            repeat_count,
        } => PreviewStep::Repeat {
            target_index: *target_index,
            repeat_count: *repeat_count,
        },
    }
}

/// Human-readable duration for an exercise step
pub fn exercise_duration_display(duration: &StepDuration) -> String {
    match duration {
        StepDuration::Reps(reps) => format!("{reps} reps"),
        StepDuration::Time(seconds) => {
            if *seconds >= 60 {
                format!("{}:{:02}", seconds / 60, seconds % 60)
            } else {
                format!("{seconds}s")
            }
        }
        StepDuration::Distance(meters) => format_meters(*meters),
        StepDuration::Open => "Lap Button".into(),
    }
}

fn warmup_duration_display(duration: &StepDuration) -> String {
    match duration {
        StepDuration::Time(seconds) if *seconds >= 60 => {
            let minutes = seconds / 60;
            let rest = seconds % 60;
            if rest > 0 {
                format!("{minutes}m {rest}s")
            } else {
                format!("{minutes}m")
            }
        }
        StepDuration::Time(seconds) if *seconds > 0 => format!("{seconds}s"),
        _ => "Press Lap".into(),
    }
}

/// Human-readable distance: "500m" below a kilometre, "1.5km" above
pub fn format_meters(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1}km", meters / 1000.0)
    } else {
        format!("{}m", meters as u32)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Exercise, Reps, Superset, WorkoutSettings};

    fn workout() -> Workout {
        Workout {
            title: "Engine Builder".into(),
            settings: WorkoutSettings::default(),
            blocks: vec![Block {
                structure: Some("2 rounds".into()),
                supersets: vec![Superset {
                    exercises: vec![
                        Exercise {
                            name: "500m Row".into(),
                            reps: Some(Reps::Text("500m".into())),
                            ..Exercise::default()
                        },
                        Exercise {
                            name: "Goblet Squat".into(),
                            reps: Some(Reps::Count(12)),
                            ..Exercise::default()
                        },
                    ],
                    rest_sec: Some(90),
                    rest_type: Some(RestType::Timed),
                }],
                ..Block::default()
            }],
        }
    }

    fn export_default(workout: &Workout) -> ExportBundle {
        export(
            workout,
            &CategoryResolver::new(),
            &ExportOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_plan_and_preview_mirror_each_other() {
        let bundle = export_default(&workout());
        assert_eq!(bundle.plan.steps.len(), bundle.preview.steps.len());

        for (compiled, previewed) in bundle.plan.steps.iter().zip(&bundle.preview.steps) {
            match (compiled, previewed) {
                (CompiledStep::Exercise(e), PreviewStep::Exercise { display_name, .. }) => {
                    assert_eq!(&e.display_name, display_name);
                }
                (CompiledStep::Rest { .. }, PreviewStep::Rest { .. }) => {}
                (CompiledStep::Warmup { .. }, PreviewStep::Warmup { .. }) => {}
                (CompiledStep::Repeat { .. }, PreviewStep::Repeat { .. }) => {}
                (c, p) => panic!("diverged: {c:?} vs {p:?}"),
            }
        }
    }

    #[test]
    fn test_mixed_workout_classifies_as_cardio() {
        let bundle = export_default(&workout());
        assert_eq!(bundle.plan.sport, Sport::Training);
        assert_eq!(bundle.plan.sub_sport, SubSport::CardioTraining);
        assert_eq!(bundle.preview.sport_name, "cardio");
        assert!(bundle.preview.has_cardio);
        assert!(bundle.preview.has_strength);
        assert!(!bundle.preview.has_running);
    }

    #[test]
    fn test_forced_sport_bypasses_detection() {
        let bundle = export(
            &workout(),
            &CategoryResolver::new(),
            &ExportOptions {
                forced_sport: Some(ForcedSport::Strength),
                ..ExportOptions::default()
            },
        )
        .unwrap();
        assert_eq!(bundle.plan.sub_sport, SubSport::StrengthTraining);
    }

    #[test]
    fn test_valid_step_count_excludes_repeat_markers() {
        let bundle = export_default(&workout());
        let markers = bundle
            .plan
            .steps
            .iter()
            .filter(|s| s.is_repeat())
            .count() as u32;
        assert!(markers > 0);
        assert_eq!(
            bundle.plan.num_valid_steps,
            bundle.plan.steps.len() as u32 - markers
        );
    }

    #[test]
    fn test_title_truncated_to_wire_limit() {
        let mut long = workout();
        long.title = "X".repeat(80);
        let bundle = export_default(&long);
        assert_eq!(bundle.plan.title.chars().count(), WIRE_NAME_LIMIT);
        // The preview keeps the authored title
        assert_eq!(bundle.preview.title.chars().count(), 80);
    }

    #[test]
    fn test_notes_truncated_to_wire_limit() {
        let workout = Workout {
            title: "Test".into(),
            settings: WorkoutSettings::default(),
            blocks: vec![Block {
                exercises: vec![Exercise {
                    name: "Plank".into(),
                    notes: Some("y".repeat(300)),
                    ..Exercise::default()
                }],
                ..Block::default()
            }],
        };
        let bundle = export_default(&workout);
        let step = bundle
            .plan
            .steps
            .iter()
            .find_map(CompiledStep::as_exercise)
            .unwrap();
        assert_eq!(step.notes.as_ref().unwrap().chars().count(), WIRE_NOTES_LIMIT);
    }

    #[test]
    fn test_summary_counts() {
        let bundle = export_default(&workout());
        assert_eq!(bundle.preview.exercise_count, 2);
        assert_eq!(bundle.preview.rest_count, 1);
        // Superset members inherit the block's round count as their sets
        assert_eq!(bundle.preview.total_sets, 4);
    }

    #[test]
    fn test_duration_displays() {
        assert_eq!(exercise_duration_display(&StepDuration::Reps(12)), "12 reps");
        assert_eq!(exercise_duration_display(&StepDuration::Time(45)), "45s");
        assert_eq!(exercise_duration_display(&StepDuration::Time(90)), "1:30");
        assert_eq!(
            exercise_duration_display(&StepDuration::Distance(500.0)),
            "500m"
        );
        assert_eq!(
            exercise_duration_display(&StepDuration::Distance(1500.0)),
            "1.5km"
        );
        assert_eq!(exercise_duration_display(&StepDuration::Open), "Lap Button");

        assert_eq!(warmup_duration_display(&StepDuration::Time(150)), "2m 30s");
        assert_eq!(warmup_duration_display(&StepDuration::Time(120)), "2m");
        assert_eq!(warmup_duration_display(&StepDuration::Time(45)), "45s");
        assert_eq!(warmup_duration_display(&StepDuration::Open), "Press Lap");
    }

    #[test]
    fn test_titles_cover_every_exercise_step() {
        let bundle = export_default(&workout());
        for step in &bundle.plan.steps {
            if let Some(e) = step.as_exercise() {
                assert!(bundle
                    .plan
                    .titles
                    .iter()
                    .any(|t| t.category_id == e.category_id
                        && Some(t.exercise_id) == e.movement_id));
            }
        }
    }
}
