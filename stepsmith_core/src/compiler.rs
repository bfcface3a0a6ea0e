//! Step compilation: the workout tree flattened into a linear step program.
//!
//! A single depth-first pass walks blocks, supersets and exercises in
//! order, inserting warm-ups and rests and emitting repeat back-references
//! for multi-set exercises and multi-round supersets. The input tree is
//! never mutated; transient per-exercise context lives in a local
//! annotation pass scoped to one compilation.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::resolver::{CategoryResolver, MatchKind, ResolvedCategory};
use crate::rest::{resolve_rest, RestDefaults, RestLayer, RestPlan};
use crate::types::{
    Block, CompiledStep, Exercise, ExerciseStep, Intensity, Reps, RestType, StepDuration,
    WarmupActivity, WarmupSpec, Workout,
};

/// Rep count used when a textual prescription cannot be parsed
const DEFAULT_REPS: u32 = 10;

/// Compilation switches
#[derive(Clone, Copy, Debug, Default)]
pub struct CompileOptions {
    /// Force every exercise to open/button completion
    pub use_lap_button: bool,
}

/// A title record: the display name for one (category, exercise id) pair
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TitleEntry {
    pub category_id: u8,
    pub exercise_id: u16,
    pub display_name: String,
}

/// Per-compilation bookkeeping of (category, display name) → exercise id.
///
/// The device movement id is used when the resolver supplied one; otherwise
/// ids are assigned sequentially per category starting at 0. The same pair
/// always maps to the same id within one compilation.
#[derive(Debug, Default)]
pub struct TitleTable {
    entries: Vec<TitleEntry>,
    index: HashMap<(u8, String), u16>,
    counters: HashMap<u8, u16>,
}

impl TitleTable {
    fn assign(&mut self, category_id: u8, display_name: &str, movement_id: Option<u16>) -> u16 {
        let key = (category_id, display_name.to_string());
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = movement_id.unwrap_or_else(|| {
            let counter = self.counters.entry(category_id).or_insert(0);
            let id = *counter;
            *counter += 1;
            id
        });
        self.index.insert(key, id);
        self.entries.push(TitleEntry {
            category_id,
            exercise_id: id,
            display_name: display_name.to_string(),
        });
        id
    }

    /// Title records in order of first appearance
    pub fn entries(&self) -> &[TitleEntry] {
        &self.entries
    }
}

/// Output of one compilation pass
#[derive(Debug)]
pub struct CompiledProgram {
    pub steps: Vec<CompiledStep>,
    /// Validated category ids encountered across all exercise steps
    pub categories: BTreeSet<u8>,
    pub titles: TitleTable,
}

// ============================================================================
// Annotation pass
// ============================================================================

/// Superset context for one member exercise
#[derive(Clone, Copy, Debug)]
struct SupersetCtx {
    first_in_superset: bool,
    last_in_superset: bool,
    /// Resolved trailing rest for the whole superset, if configured
    rest: Option<RestPlan>,
    rounds: u32,
    /// True when this superset is the last group in its block
    last_group_in_block: bool,
}

/// One exercise occurrence with its compilation context.
///
/// Built fresh per block and discarded afterwards; replaces the transient
/// flags the source data would otherwise have to carry.
struct ExercisePlan<'a> {
    exercise: &'a Exercise,
    superset: Option<SupersetCtx>,
    last_in_block: bool,
}

fn annotate_block<'a>(
    block: &'a Block,
    rounds: u32,
    block_layer: Option<RestLayer>,
    defaults: RestDefaults,
) -> Vec<ExercisePlan<'a>> {
    let mut plans = Vec::new();
    let has_standalone = !block.exercises.is_empty();
    let superset_count = block.supersets.len();

    for (superset_idx, superset) in block.supersets.iter().enumerate() {
        let rest = resolve_rest(
            RestLayer::new(superset.rest_type, superset.rest_sec),
            block_layer,
            defaults,
        );
        let last_group = superset_idx + 1 == superset_count && !has_standalone;
        let member_count = superset.exercises.len();
        for (ex_idx, exercise) in superset.exercises.iter().enumerate() {
            plans.push(ExercisePlan {
                exercise,
                superset: Some(SupersetCtx {
                    first_in_superset: ex_idx == 0,
                    last_in_superset: ex_idx + 1 == member_count,
                    rest,
                    rounds,
                    last_group_in_block: last_group,
                }),
                last_in_block: false,
            });
        }
    }

    let standalone_count = block.exercises.len();
    for (ex_idx, exercise) in block.exercises.iter().enumerate() {
        plans.push(ExercisePlan {
            exercise,
            superset: None,
            last_in_block: ex_idx + 1 == standalone_count,
        });
    }

    plans
}

// ============================================================================
// Helpers
// ============================================================================

static ROUND_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());
static DISTANCE_KM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\d.]+)\s*km$").unwrap());
static DISTANCE_M: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\d.]+)\s*m$").unwrap());
static NAME_DISTANCE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[\d.]+\s*(m|km|mi)\s+").unwrap());
static NAME_MULTIPLIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\d*x\d+").unwrap());

/// Parse a round count from a free-text structure label like "3 rounds"
fn parse_round_count(structure: Option<&str>) -> u32 {
    structure
        .and_then(|s| ROUND_COUNT.captures(s))
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(1)
}

/// Whether an input name looks like a human-confirmed display name.
///
/// Such names are mostly Title Case and carry no distance prefix or rep
/// multiplier; they are preserved verbatim instead of being replaced by a
/// dictionary or category label.
fn is_confirmed_name(name: &str) -> bool {
    let name = name.trim();
    if name.len() < 2 {
        return false;
    }
    if NAME_DISTANCE_PREFIX.is_match(name) || NAME_MULTIPLIER.is_match(name) {
        return false;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    capitalized as f64 >= words.len() as f64 * 0.6
}

fn choose_display_name(name: &str, resolved: &ResolvedCategory) -> String {
    if resolved.kind == MatchKind::Exact {
        resolved
            .canonical_name
            .clone()
            .unwrap_or_else(|| name.to_string())
    } else if is_confirmed_name(name) {
        name.to_string()
    } else {
        resolved
            .canonical_name
            .clone()
            .unwrap_or_else(|| resolved.category_label.to_string())
    }
}

/// Pick the duration kind for an exercise, first signal wins:
/// explicit distance, distance parsed from textual reps, explicit time,
/// explicit reps (or range bound), otherwise open.
fn select_duration(exercise: &Exercise, use_lap_button: bool) -> StepDuration {
    if use_lap_button {
        return StepDuration::Open;
    }

    if let Some(distance) = exercise.distance_m.filter(|d| *d > 0.0) {
        return StepDuration::Distance(distance);
    }

    if let Some(Reps::Text(text)) = &exercise.reps {
        let text = text.trim().to_lowercase();
        if let Some(c) = DISTANCE_KM.captures(&text) {
            if let Ok(km) = c[1].parse::<f64>() {
                return StepDuration::Distance(km * 1000.0);
            }
        }
        if let Some(c) = DISTANCE_M.captures(&text) {
            if let Ok(meters) = c[1].parse::<f64>() {
                return StepDuration::Distance(meters);
            }
        }
    }

    if let Some(seconds) = exercise.duration_sec.filter(|s| *s > 0) {
        return StepDuration::Time(seconds);
    }

    match &exercise.reps {
        Some(Reps::Count(n)) => {
            return StepDuration::Reps(if *n > 0 { *n } else { DEFAULT_REPS });
        }
        Some(Reps::Text(text)) => {
            // Lowest bound of a range like "6-8"
            let reps = text
                .split('-')
                .next()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_REPS);
            return StepDuration::Reps(reps);
        }
        None => {}
    }

    if let Some(range) = &exercise.reps_range {
        // Upper bound of a range like "6-8"
        let reps = range
            .replace('-', " ")
            .split_whitespace()
            .last()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_REPS);
        return StepDuration::Reps(reps);
    }

    StepDuration::Open
}

fn warmup_step(spec: &WarmupSpec) -> CompiledStep {
    let display_name = spec
        .activity
        .map_or("Warm-Up", WarmupActivity::label)
        .to_string();
    let duration = match spec.duration_sec {
        Some(seconds) if seconds > 0 => StepDuration::Time(seconds),
        _ => StepDuration::Open,
    };
    CompiledStep::Warmup {
        display_name,
        duration,
    }
}

fn default_warmup_step() -> CompiledStep {
    CompiledStep::Warmup {
        display_name: "Warm-Up".into(),
        duration: StepDuration::Open,
    }
}

fn rest_step(plan: RestPlan) -> CompiledStep {
    CompiledStep::Rest {
        rest_type: plan.rest_type(),
        seconds: plan.seconds(),
    }
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile a workout into its linear step program.
///
/// Missing optional fields all have defaults and never fail compilation;
/// the only rejection is a workout that produces no exercise steps at all.
pub fn compile(
    workout: &Workout,
    resolver: &CategoryResolver,
    options: &CompileOptions,
) -> Result<CompiledProgram> {
    let mut steps: Vec<CompiledStep> = Vec::new();
    let mut categories = BTreeSet::new();
    let mut titles = TitleTable::default();
    let defaults = RestDefaults::from(&workout.settings);

    // Workout-level warm-up before everything; otherwise a default open
    // warm-up unless the first block declares its own (avoids doubling up).
    if let Some(spec) = &workout.settings.warmup {
        steps.push(warmup_step(spec));
    } else if workout.blocks.first().is_none_or(|b| b.warmup.is_none()) {
        steps.push(default_warmup_step());
    }

    let block_count = workout.blocks.len();
    for (block_idx, block) in workout.blocks.iter().enumerate() {
        let is_last_block = block_idx + 1 == block_count;

        if let Some(spec) = &block.warmup {
            steps.push(warmup_step(spec));
        }

        let rounds = parse_round_count(block.structure.as_deref());
        let block_layer = RestLayer::from_override(block.rest_override.as_ref());
        let plans = annotate_block(block, rounds, block_layer, defaults);
        let mut superset_start: Option<usize> = None;

        for plan in &plans {
            let exercise = plan.exercise;
            if plan
                .superset
                .as_ref()
                .is_some_and(|s| s.first_in_superset)
            {
                superset_start = Some(steps.len());
            }

            let resolved = resolver.resolve(&exercise.name);
            categories.insert(resolved.category_id);
            let display_name = choose_display_name(&exercise.name, &resolved);
            let duration = select_duration(exercise, options.use_lap_button);
            let sets = exercise.sets.filter(|s| *s > 0).unwrap_or(rounds).max(1);
            let exercise_rest = resolve_rest(
                RestLayer::new(exercise.rest_type, exercise.rest_sec),
                block_layer,
                defaults,
            );

            // Warm-up sets precede the working sets of standalone exercises.
            let warmup_sets = exercise.warmup_sets.unwrap_or(0);
            let warmup_reps = exercise.warmup_reps.unwrap_or(0);
            if plan.superset.is_none() && warmup_sets > 0 && warmup_reps > 0 {
                let warmup_name = format!("{display_name} (Warm-Up)");
                let warmup_id =
                    titles.assign(resolved.category_id, &warmup_name, resolved.movement_id);
                let warmup_start = steps.len();
                steps.push(CompiledStep::Exercise(ExerciseStep {
                    display_name: warmup_name,
                    original_name: exercise.name.clone(),
                    category_id: resolved.category_id,
                    intensity: Intensity::Warmup,
                    duration: StepDuration::Reps(warmup_reps),
                    sets: warmup_sets,
                    notes: None,
                    movement_id: Some(warmup_id),
                }));
                if warmup_sets > 1 {
                    steps.push(rest_step(exercise_rest.unwrap_or_else(RestPlan::fallback)));
                    steps.push(CompiledStep::Repeat {
                        target_index: warmup_start,
                        repeat_count: warmup_sets,
                    });
                }
                // Rest before the working sets
                steps.push(rest_step(exercise_rest.unwrap_or_else(RestPlan::fallback)));
            }

            let start_index = steps.len();
            let title_id = titles.assign(resolved.category_id, &display_name, resolved.movement_id);
            steps.push(CompiledStep::Exercise(ExerciseStep {
                display_name,
                original_name: exercise.name.clone(),
                category_id: resolved.category_id,
                intensity: Intensity::Active,
                duration,
                sets,
                notes: exercise.notes.clone(),
                movement_id: Some(title_id),
            }));

            match &plan.superset {
                Some(ctx) => {
                    // Superset members run back-to-back; rest and repeat
                    // only after the last member.
                    if ctx.last_in_superset {
                        if let Some(rest) = ctx.rest {
                            let last_in_program = is_last_block && ctx.last_group_in_block;
                            // With rounds > 1 the rest sits inside the
                            // repeat loop; with a single round it is
                            // skipped only at the very end of the program.
                            if ctx.rounds > 1 || !last_in_program {
                                steps.push(rest_step(rest));
                            }
                        }
                        if ctx.rounds > 1 {
                            let target_index = superset_start.unwrap_or(start_index);
                            steps.push(CompiledStep::Repeat {
                                target_index,
                                repeat_count: ctx.rounds,
                            });
                        }
                        superset_start = None;
                    }
                }
                None => {
                    if sets > 1 {
                        steps.push(rest_step(exercise_rest.unwrap_or_else(RestPlan::fallback)));
                        steps.push(CompiledStep::Repeat {
                            target_index: start_index,
                            repeat_count: sets,
                        });
                    } else if let Some(rest) = exercise_rest {
                        if !(is_last_block && plan.last_in_block) {
                            steps.push(rest_step(rest));
                        }
                    }
                }
            }
        }

        if let Some(seconds) = block.rest_after_sec.filter(|s| *s > 0) {
            if !is_last_block {
                let block_type = block_layer
                    .and_then(|l| l.rest_type)
                    .unwrap_or(defaults.rest_type);
                let plan = match block_type {
                    RestType::Button => RestPlan::Button,
                    RestType::Timed => RestPlan::Timed { seconds },
                };
                steps.push(rest_step(plan));
            }
        }
    }

    if !steps.iter().any(CompiledStep::is_exercise) {
        return Err(Error::EmptyWorkout);
    }

    tracing::info!(
        steps = steps.len(),
        categories = categories.len(),
        "compiled workout"
    );

    Ok(CompiledProgram {
        steps,
        categories,
        titles,
    })
}
