//! Step decompilation: a previously linearized step record list turned back
//! into display-oriented structure.
//!
//! The inverse of compilation is heuristic: a `[exercise, rest, repeat]`
//! triple where the marker references the exercise collapses into a single
//! display step carrying a set count; every other repeat record is dropped,
//! never shown on its own.

use serde::Serialize;

use crate::records::{RecordIntensity, RecordStream, StepRecord, TitleRecord};
use crate::taxonomy::{category_label, MAX_VALID_CATEGORY_ID};
use crate::types::StepDuration;

/// Display classification of a reconstructed step
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStepKind {
    Active,
    Rest,
    Warmup,
    Cooldown,
}

/// One reconstructed step, ready for display
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DisplayStep {
    pub name: String,
    pub kind: DisplayStepKind,
    /// Raw category id from the record; may be out of range in foreign files
    pub category_id: Option<u16>,
    pub duration: StepDuration,
    /// Total set count implied by a collapsed repeat marker, else 1
    pub sets: u32,
    pub notes: Option<String>,
}

/// A workout reconstructed from a decoded record stream
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DecompiledWorkout {
    pub name: String,
    pub sport: Option<String>,
    pub sub_sport: Option<String>,
    pub created: Option<String>,
    pub manufacturer: Option<String>,
    pub source: Option<String>,
    pub steps: Vec<DisplayStep>,
}

/// Title lookup built from auxiliary title records
struct TitleLookup<'a> {
    titles: &'a [TitleRecord],
}

impl<'a> TitleLookup<'a> {
    fn new(titles: &'a [TitleRecord]) -> Self {
        Self { titles }
    }

    fn find(&self, category_id: Option<u16>, exercise_id: Option<u16>) -> Option<&'a str> {
        let category_id = category_id?;
        // Exact (category, exercise) pair first, then any title from the
        // same category.
        self.titles
            .iter()
            .find(|t| t.category_id == Some(category_id) && t.exercise_id == exercise_id)
            .or_else(|| {
                self.titles
                    .iter()
                    .find(|t| t.category_id == Some(category_id))
            })
            .and_then(|t| t.name.as_deref())
    }
}

fn step_name(step: &StepRecord, titles: &TitleLookup<'_>) -> String {
    if let Some(name) = &step.name {
        return name.clone();
    }
    if let Some(name) = titles.find(step.category_id, step.exercise_id) {
        return name.to_string();
    }
    match step.category_id {
        Some(id) if id <= u16::from(MAX_VALID_CATEGORY_ID) => {
            category_label(id as u8).to_string()
        }
        Some(id) => format!("Exercise {id}"),
        None => "Exercise".into(),
    }
}

fn step_kind(step: &StepRecord) -> DisplayStepKind {
    match step.intensity {
        Some(RecordIntensity::Rest) => DisplayStepKind::Rest,
        Some(RecordIntensity::Warmup) => DisplayStepKind::Warmup,
        Some(RecordIntensity::Cooldown) => DisplayStepKind::Cooldown,
        _ => DisplayStepKind::Active,
    }
}

fn step_duration(step: &StepRecord) -> StepDuration {
    if let Some(reps) = step.reps {
        return StepDuration::Reps(reps);
    }
    if let Some(seconds) = step.duration_sec.filter(|s| *s > 0.0) {
        return StepDuration::Time(seconds.round() as u32);
    }
    if let Some(distance) = step.distance_m.filter(|d| *d > 0.0) {
        return StepDuration::Distance(distance);
    }
    StepDuration::Open
}

/// Reconstruct a display workout from a grouped record stream.
///
/// An empty stream reconstructs to an empty workout; undecodable input is
/// rejected upstream by [`crate::records::parse_records`].
pub fn decompile(stream: &RecordStream) -> DecompiledWorkout {
    let titles = TitleLookup::new(&stream.titles);
    let records = &stream.steps;
    let mut steps = Vec::new();

    let mut i = 0;
    while i < records.len() {
        let record = &records[i];

        // Repeat markers only make sense attached to the step they follow
        if record.is_repeat() {
            i += 1;
            continue;
        }

        let mut sets = 1;
        if i + 2 < records.len() {
            let potential_rest = &records[i + 1];
            let potential_repeat = &records[i + 2];
            let references_this = potential_repeat
                .target_step
                .map_or(true, |t| t as usize == i);
            if potential_rest.is_rest() && potential_repeat.is_repeat() && references_this {
                sets = potential_repeat.repeat_count.unwrap_or(0) + 1;
                i += 2; // the rest and marker are consumed by the collapse
            }
        }

        steps.push(DisplayStep {
            name: step_name(record, &titles),
            kind: step_kind(record),
            category_id: record.category_id,
            duration: step_duration(record),
            sets,
            notes: record.notes.clone(),
        });
        i += 1;
    }

    let meta = stream.workout_meta.clone().unwrap_or_default();
    let file_meta = stream.file_meta.clone().unwrap_or_default();

    tracing::debug!(steps = steps.len(), "decompiled record stream");

    DecompiledWorkout {
        name: meta.name.unwrap_or_else(|| "Workout".into()),
        sport: meta.sport,
        sub_sport: meta.sub_sport,
        created: file_meta.created,
        manufacturer: file_meta.manufacturer,
        source: file_meta.product,
        steps,
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Result of validating a record stream for device compatibility
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a record stream for problems a target device would reject or
/// mishandle. Out-of-range categories are hard issues; questionable sport
/// combinations are warnings.
pub fn validate_stream(stream: &RecordStream) -> ValidationReport {
    let titles = TitleLookup::new(&stream.titles);
    let mut report = ValidationReport {
        valid: true,
        issues: Vec::new(),
        warnings: Vec::new(),
    };

    for step in &stream.steps {
        if let Some(category_id) = step.category_id {
            if category_id > u16::from(MAX_VALID_CATEGORY_ID) {
                report.valid = false;
                report.issues.push(format!(
                    "invalid exercise category {category_id} in '{}'; some devices reject the whole workout",
                    step_name(step, &titles)
                ));
            }
        }
    }

    if let Some(meta) = &stream.workout_meta {
        if meta.sport.as_deref() == Some("fitness_equipment")
            && meta.sub_sport.as_deref() == Some("generic")
        {
            report.warnings.push(
                "generic fitness-equipment sport type; training/strength_training is more widely supported"
                    .into(),
            );
        }
    }

    report
}
