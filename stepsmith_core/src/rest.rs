//! Rest settings hierarchy.
//!
//! Rest type and duration resolve per field through a layered override
//! chain: exercise-level explicit value, then the enclosing group's
//! override (only when explicitly enabled), then the workout-level default.
//! When the chain resolves to a timed rest with no duration anywhere, the
//! rest counts as unconfigured; call sites that must emit a rest regardless
//! fall back to the hard-coded button plan.

use crate::types::{RestOverride, RestType, WorkoutSettings};

/// A fully resolved rest step plan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestPlan {
    /// Wait for a lap-button press
    Button,
    Timed { seconds: u32 },
}

impl RestPlan {
    pub fn rest_type(self) -> RestType {
        match self {
            RestPlan::Button => RestType::Button,
            RestPlan::Timed { .. } => RestType::Timed,
        }
    }

    pub fn seconds(self) -> u32 {
        match self {
            RestPlan::Button => 0,
            RestPlan::Timed { seconds } => seconds,
        }
    }

    /// The fallback when a rest must be emitted but nothing is configured
    pub fn fallback() -> RestPlan {
        RestPlan::Button
    }
}

/// One layer of the override chain; both fields optional
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestLayer {
    pub rest_type: Option<RestType>,
    pub rest_sec: Option<u32>,
}

impl RestLayer {
    pub fn new(rest_type: Option<RestType>, rest_sec: Option<u32>) -> Self {
        Self {
            rest_type,
            rest_sec,
        }
    }

    /// The block override layer; absent unless explicitly enabled
    pub fn from_override(rest_override: Option<&RestOverride>) -> Option<Self> {
        rest_override
            .filter(|o| o.enabled)
            .map(|o| Self::new(o.rest_type, o.rest_sec))
    }
}

/// Workout-level rest defaults, the last consulted layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestDefaults {
    pub rest_type: RestType,
    pub rest_sec: Option<u32>,
}

impl From<&WorkoutSettings> for RestDefaults {
    fn from(settings: &WorkoutSettings) -> Self {
        Self {
            rest_type: settings.default_rest_type,
            rest_sec: settings.default_rest_sec,
        }
    }
}

/// Resolve the rest configured for one position in the tree.
///
/// Returns `None` when the chain resolves to a timed rest with no positive
/// duration at any layer, which means no rest is configured there.
pub fn resolve_rest(
    exercise: RestLayer,
    group: Option<RestLayer>,
    defaults: RestDefaults,
) -> Option<RestPlan> {
    let rest_type = exercise
        .rest_type
        .or_else(|| group.and_then(|g| g.rest_type))
        .unwrap_or(defaults.rest_type);

    let seconds = exercise
        .rest_sec
        .or_else(|| group.and_then(|g| g.rest_sec))
        .or(defaults.rest_sec);

    match rest_type {
        RestType::Button => Some(RestPlan::Button),
        RestType::Timed => seconds
            .filter(|s| *s > 0)
            .map(|seconds| RestPlan::Timed { seconds }),
    }
}
