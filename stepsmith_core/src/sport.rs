//! Sport classification from the categories a workout uses.
//!
//! Categories partition into running, cardio-machine and strength. Cardio
//! takes precedence over strength for mixed workloads, so conditioning
//! workouts that blend runs with carries and squats still export as cardio.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{CATEGORY_CARDIO, CATEGORY_ROW, CATEGORY_RUN};

/// Top-level device sport
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Running,
    Training,
}

impl Sport {
    /// Wire id of this sport
    pub fn wire_id(self) -> u8 {
        match self {
            Sport::Running => 1,
            Sport::Training => 10,
        }
    }
}

/// Device sub-sport refining the sport
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubSport {
    Generic,
    StrengthTraining,
    CardioTraining,
}

impl SubSport {
    /// Wire id of this sub-sport
    pub fn wire_id(self) -> u8 {
        match self {
            SubSport::Generic => 0,
            SubSport::StrengthTraining => 20,
            SubSport::CardioTraining => 26,
        }
    }
}

/// A caller-forced classification, bypassing detection
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ForcedSport {
    Strength,
    Cardio,
    Running,
}

/// Result of sport classification
#[derive(Clone, Debug, PartialEq)]
pub struct SportClassification {
    pub sport: Sport,
    pub sub_sport: SubSport,
    /// Short classification name: "running", "cardio" or "strength"
    pub name: &'static str,
    pub warnings: Vec<String>,
}

impl SportClassification {
    fn running() -> Self {
        Self {
            sport: Sport::Running,
            sub_sport: SubSport::Generic,
            name: "running",
            warnings: Vec::new(),
        }
    }

    fn cardio() -> Self {
        Self {
            sport: Sport::Training,
            sub_sport: SubSport::CardioTraining,
            name: "cardio",
            warnings: Vec::new(),
        }
    }

    fn strength() -> Self {
        Self {
            sport: Sport::Training,
            sub_sport: SubSport::StrengthTraining,
            name: "strength",
            warnings: Vec::new(),
        }
    }

    /// The classification a caller forced, bypassing detection
    pub fn forced(forced: ForcedSport) -> Self {
        match forced {
            ForcedSport::Strength => Self::strength(),
            ForcedSport::Cardio => Self::cardio(),
            ForcedSport::Running => Self::running(),
        }
    }
}

/// Category ids counted as running
const RUNNING_CATEGORIES: [u8; 1] = [CATEGORY_RUN];
/// Category ids counted as cardio machines
const CARDIO_MACHINE_CATEGORIES: [u8; 2] = [CATEGORY_CARDIO, CATEGORY_ROW];

/// Whether a category id belongs to the running partition
pub fn is_running_category(category_id: u8) -> bool {
    RUNNING_CATEGORIES.contains(&category_id)
}

/// Whether a category id belongs to the cardio-machine partition
pub fn is_cardio_machine_category(category_id: u8) -> bool {
    CARDIO_MACHINE_CATEGORIES.contains(&category_id)
}

/// Classify the best sport/sub-sport for a set of used categories.
///
/// Decision order: running-only → running; any running or cardio-machine
/// presence → cardio; strength only → strength; empty set → strength.
pub fn classify(categories: &BTreeSet<u8>) -> SportClassification {
    let has_running = categories.iter().any(|c| is_running_category(*c));
    let has_cardio_machines = categories.iter().any(|c| is_cardio_machine_category(*c));
    let has_strength = categories
        .iter()
        .any(|c| !is_running_category(*c) && !is_cardio_machine_category(*c));

    let classification = if has_running && !has_strength && !has_cardio_machines {
        SportClassification::running()
    } else if has_running || has_cardio_machines {
        SportClassification::cardio()
    } else if has_strength {
        SportClassification::strength()
    } else {
        let mut fallback = SportClassification::strength();
        fallback
            .warnings
            .push("no exercise categories detected; defaulting to strength".into());
        fallback
    };

    tracing::info!(
        sport = classification.name,
        running = has_running,
        cardio = has_cardio_machines,
        strength = has_strength,
        "classified sport"
    );

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{CATEGORY_SQUAT, CATEGORY_TOTAL_BODY};

    fn set(ids: &[u8]) -> BTreeSet<u8> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_running_only() {
        let c = classify(&set(&[CATEGORY_RUN]));
        assert_eq!(c.sport, Sport::Running);
        assert_eq!(c.sub_sport, SubSport::Generic);
        assert_eq!(c.name, "running");
    }

    #[test]
    fn test_running_with_strength_is_cardio() {
        let c = classify(&set(&[CATEGORY_RUN, CATEGORY_SQUAT]));
        assert_eq!(c.sport, Sport::Training);
        assert_eq!(c.sub_sport, SubSport::CardioTraining);
        assert_eq!(c.name, "cardio");
    }

    #[test]
    fn test_cardio_machine_with_strength_is_cardio() {
        let c = classify(&set(&[CATEGORY_ROW, CATEGORY_TOTAL_BODY]));
        assert_eq!(c.sub_sport, SubSport::CardioTraining);
    }

    #[test]
    fn test_strength_only() {
        let c = classify(&set(&[CATEGORY_SQUAT]));
        assert_eq!(c.sport, Sport::Training);
        assert_eq!(c.sub_sport, SubSport::StrengthTraining);
        assert_eq!(c.name, "strength");
    }

    #[test]
    fn test_empty_set_defaults_to_strength_with_warning() {
        let c = classify(&BTreeSet::new());
        assert_eq!(c.sub_sport, SubSport::StrengthTraining);
        assert_eq!(c.warnings.len(), 1);
    }

    #[test]
    fn test_wire_ids() {
        assert_eq!(Sport::Running.wire_id(), 1);
        assert_eq!(Sport::Training.wire_id(), 10);
        assert_eq!(SubSport::Generic.wire_id(), 0);
        assert_eq!(SubSport::StrengthTraining.wire_id(), 20);
        assert_eq!(SubSport::CardioTraining.wire_id(), 26);
    }

    #[test]
    fn test_forced_classification() {
        let c = SportClassification::forced(ForcedSport::Cardio);
        assert_eq!(c.sub_sport, SubSport::CardioTraining);
        let c = SportClassification::forced(ForcedSport::Running);
        assert_eq!(c.sport, Sport::Running);
    }
}
