//! Exercise category taxonomy and name dictionaries.
//!
//! The target wire format recognizes a closed set of exercise categories,
//! ids 0 through 32. Extended ids (33+) exist in some exports but cause the
//! receiving device to reject the whole artifact, so every id produced
//! anywhere in this crate is funneled through [`validate_category_id`].
//!
//! All tables are built once and cached for the process lifetime.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Maximum valid category id; everything above is an extended category
pub const MAX_VALID_CATEGORY_ID: u8 = 32;

// Category ids referenced by name elsewhere in the crate
pub const CATEGORY_CARDIO: u8 = 2;
pub const CATEGORY_CORE: u8 = 5;
pub const CATEGORY_ROW: u8 = 23;
pub const CATEGORY_SQUAT: u8 = 28;
pub const CATEGORY_TOTAL_BODY: u8 = 29;
pub const CATEGORY_RUN: u8 = 32;

/// Display labels for the valid categories, indexed by id
const CATEGORY_LABELS: [&str; 33] = [
    "Bench Press",
    "Calf Raise",
    "Cardio",
    "Carry",
    "Chop",
    "Core",
    "Crunch",
    "Curl",
    "Deadlift",
    "Flye",
    "Hip Raise",
    "Hip Stability",
    "Hip Swing",
    "Hyperextension",
    "Lateral Raise",
    "Leg Curl",
    "Leg Raise",
    "Lunge",
    "Olympic Lift",
    "Plank",
    "Plyo",
    "Pull Up",
    "Push Up",
    "Row",
    "Shoulder Press",
    "Shoulder Stability",
    "Shrug",
    "Sit Up",
    "Squat",
    "Total Body",
    "Triceps Extension",
    "Warm Up",
    "Run",
];

/// Remap table for known extended categories.
///
/// Cardio-like extensions collapse onto the generic Cardio bucket, and
/// strength-like extensions onto Total Body.
const EXTENDED_CATEGORY_REMAP: [(u16, u8); 11] = [
    (33, CATEGORY_CARDIO),
    (34, CATEGORY_CARDIO),
    (35, CATEGORY_CARDIO),
    (36, CATEGORY_CARDIO),
    (37, CATEGORY_CARDIO),
    // Indoor rower: the Row category does not cover erg machines
    (38, CATEGORY_CARDIO),
    (39, CATEGORY_TOTAL_BODY),
    (40, CATEGORY_TOTAL_BODY),
    (41, CATEGORY_TOTAL_BODY),
    (42, CATEGORY_TOTAL_BODY),
    (43, CATEGORY_TOTAL_BODY),
];

/// Clamp a category id into the valid range.
///
/// Ids already in range pass through unchanged. Known extended ids are
/// substituted per the remap table; anything else collapses to the generic
/// Total Body bucket. Idempotent.
pub fn validate_category_id(category_id: u16) -> u8 {
    if category_id <= u16::from(MAX_VALID_CATEGORY_ID) {
        return category_id as u8;
    }

    if let Some((_, replacement)) = EXTENDED_CATEGORY_REMAP
        .iter()
        .find(|(extended, _)| *extended == category_id)
    {
        return *replacement;
    }

    CATEGORY_TOTAL_BODY
}

/// Display label for a valid category id
pub fn category_label(category_id: u8) -> &'static str {
    CATEGORY_LABELS
        .get(usize::from(category_id))
        .copied()
        .unwrap_or("Exercise")
}

// ============================================================================
// Dictionaries
// ============================================================================

/// One curated dictionary entry: a normalized name mapped to its category
/// and canonical display name, plus the device movement id when known.
#[derive(Clone, Copy, Debug)]
pub struct DictEntry {
    /// Normalized (lower-case) lookup key
    pub name: &'static str,
    /// Canonical display name
    pub display_name: &'static str,
    /// Category id before validation; a few entries carry extended ids
    pub category_id: u16,
    /// Device movement id within the category, when known
    pub movement_id: Option<u16>,
}

/// A keyword mapped to a category with an optional display name
#[derive(Clone, Copy, Debug)]
pub struct KeywordEntry {
    pub keyword: &'static str,
    pub category_id: u16,
    pub display_name: Option<&'static str>,
}

/// Built-in keywords checked before any dictionary lookup.
///
/// These exist to keep device-category choices consistent for mixed
/// workouts: "running" maps to the generic Cardio bucket rather than the
/// Run category, because Run only behaves with a running-typed export.
/// Order matters: more specific phrases come before their prefixes.
pub static BUILTIN_KEYWORDS: &[KeywordEntry] = &[
    KeywordEntry { keyword: "running", category_id: 2, display_name: Some("Run") },
    KeywordEntry { keyword: "run", category_id: 2, display_name: Some("Run") },
    KeywordEntry { keyword: "jog", category_id: 2, display_name: Some("Run") },
    KeywordEntry { keyword: "sprint", category_id: 2, display_name: Some("Run") },
    KeywordEntry { keyword: "ski erg", category_id: 2, display_name: Some("Ski Erg") },
    KeywordEntry { keyword: "ski mogul", category_id: 2, display_name: Some("Ski Erg") },
    KeywordEntry { keyword: "ski", category_id: 2, display_name: Some("Ski Erg") },
    KeywordEntry { keyword: "row erg", category_id: 23, display_name: Some("Row") },
    KeywordEntry { keyword: "rower", category_id: 23, display_name: Some("Row") },
    KeywordEntry { keyword: "indoor row", category_id: 23, display_name: Some("Indoor Row") },
    KeywordEntry { keyword: "assault bike", category_id: 2, display_name: Some("Assault Bike") },
    KeywordEntry { keyword: "echo bike", category_id: 2, display_name: Some("Echo Bike") },
    KeywordEntry { keyword: "air bike", category_id: 2, display_name: Some("Air Bike") },
    KeywordEntry { keyword: "bike erg", category_id: 2, display_name: Some("Bike Erg") },
    KeywordEntry { keyword: "burpee", category_id: 29, display_name: Some("Burpee") },
    KeywordEntry { keyword: "wall ball", category_id: 28, display_name: Some("Wall Ball") },
];

/// Secondary keyword table, consulted after an exact lookup misses.
/// Checked in declaration order; first hit wins.
pub static KEYWORDS_EN: &[KeywordEntry] = &[
    KeywordEntry { keyword: "deadlift", category_id: 8, display_name: Some("Deadlift") },
    KeywordEntry { keyword: "squat", category_id: 28, display_name: Some("Squat") },
    KeywordEntry { keyword: "lunge", category_id: 17, display_name: Some("Lunge") },
    KeywordEntry { keyword: "pull up", category_id: 21, display_name: Some("Pull Up") },
    KeywordEntry { keyword: "pullup", category_id: 21, display_name: Some("Pull Up") },
    KeywordEntry { keyword: "chin up", category_id: 21, display_name: Some("Chin Up") },
    KeywordEntry { keyword: "push up", category_id: 22, display_name: Some("Push Up") },
    KeywordEntry { keyword: "pushup", category_id: 22, display_name: Some("Push Up") },
    KeywordEntry { keyword: "plank", category_id: 19, display_name: Some("Plank") },
    KeywordEntry { keyword: "crunch", category_id: 6, display_name: Some("Crunch") },
    KeywordEntry { keyword: "sit up", category_id: 27, display_name: Some("Sit Up") },
    KeywordEntry { keyword: "curl", category_id: 7, display_name: None },
    KeywordEntry { keyword: "press", category_id: 24, display_name: None },
    KeywordEntry { keyword: "swing", category_id: 12, display_name: None },
    KeywordEntry { keyword: "carry", category_id: 3, display_name: None },
    KeywordEntry { keyword: "jump", category_id: 20, display_name: None },
    KeywordEntry { keyword: "twist", category_id: 5, display_name: None },
    KeywordEntry { keyword: "shrug", category_id: 26, display_name: Some("Shrug") },
    KeywordEntry { keyword: "row", category_id: 23, display_name: None },
];

/// The curated exercise dictionary.
///
/// Keys are already normalized. A few entries intentionally carry extended
/// category ids, mirroring upstream taxonomy data; they are collapsed by
/// [`validate_category_id`] on every lookup.
static EXERCISE_DICTIONARY: &[DictEntry] = &[
    DictEntry { name: "back squat", display_name: "Barbell Back Squat", category_id: 28, movement_id: Some(6) },
    DictEntry { name: "front squat", display_name: "Barbell Front Squat", category_id: 28, movement_id: Some(21) },
    DictEntry { name: "goblet squat", display_name: "Goblet Squat", category_id: 28, movement_id: Some(37) },
    DictEntry { name: "overhead squat", display_name: "Overhead Squat", category_id: 28, movement_id: Some(49) },
    DictEntry { name: "jump squat", display_name: "Jump Squat", category_id: 20, movement_id: None },
    DictEntry { name: "wall sit", display_name: "Wall Sit", category_id: 28, movement_id: None },
    DictEntry { name: "deadlift", display_name: "Barbell Deadlift", category_id: 8, movement_id: Some(0) },
    DictEntry { name: "romanian deadlift", display_name: "Romanian Deadlift", category_id: 8, movement_id: Some(28) },
    DictEntry { name: "single leg deadlift", display_name: "Single Leg Deadlift", category_id: 8, movement_id: None },
    DictEntry { name: "bench press", display_name: "Barbell Bench Press", category_id: 0, movement_id: Some(3) },
    DictEntry { name: "incline bench press", display_name: "Incline Barbell Bench Press", category_id: 0, movement_id: Some(16) },
    DictEntry { name: "floor press", display_name: "Barbell Floor Press", category_id: 0, movement_id: None },
    DictEntry { name: "push up", display_name: "Push Up", category_id: 22, movement_id: Some(29) },
    DictEntry { name: "pull up", display_name: "Pull Up", category_id: 21, movement_id: Some(32) },
    DictEntry { name: "chin up", display_name: "Chin Up", category_id: 21, movement_id: Some(8) },
    DictEntry { name: "row", display_name: "Row", category_id: 23, movement_id: None },
    DictEntry { name: "bent over row", display_name: "Barbell Bent Over Row", category_id: 23, movement_id: Some(4) },
    DictEntry { name: "dumbbell row", display_name: "Dumbbell Row", category_id: 23, movement_id: Some(26) },
    DictEntry { name: "inverted row", display_name: "Inverted Row", category_id: 23, movement_id: None },
    DictEntry { name: "shoulder press", display_name: "Shoulder Press", category_id: 24, movement_id: Some(1) },
    DictEntry { name: "overhead press", display_name: "Overhead Press", category_id: 24, movement_id: Some(51) },
    DictEntry { name: "push press", display_name: "Push Press", category_id: 24, movement_id: Some(54) },
    DictEntry { name: "lateral raise", display_name: "Lateral Raise", category_id: 14, movement_id: Some(12) },
    DictEntry { name: "face pull", display_name: "Face Pull", category_id: 25, movement_id: None },
    DictEntry { name: "bicep curl", display_name: "Bicep Curl", category_id: 7, movement_id: Some(10) },
    DictEntry { name: "hammer curl", display_name: "Hammer Curl", category_id: 7, movement_id: Some(16) },
    DictEntry { name: "triceps extension", display_name: "Triceps Extension", category_id: 30, movement_id: Some(18) },
    DictEntry { name: "skullcrusher", display_name: "Lying Triceps Extension", category_id: 30, movement_id: Some(14) },
    DictEntry { name: "lunge", display_name: "Lunge", category_id: 17, movement_id: Some(18) },
    DictEntry { name: "walking lunge", display_name: "Walking Lunge", category_id: 17, movement_id: Some(79) },
    DictEntry { name: "reverse lunge", display_name: "Reverse Lunge", category_id: 17, movement_id: Some(57) },
    DictEntry { name: "step up", display_name: "Step Up", category_id: 17, movement_id: None },
    DictEntry { name: "plank", display_name: "Plank", category_id: 19, movement_id: Some(44) },
    DictEntry { name: "side plank", display_name: "Side Plank", category_id: 19, movement_id: Some(60) },
    DictEntry { name: "crunch", display_name: "Crunch", category_id: 6, movement_id: Some(9) },
    DictEntry { name: "sit up", display_name: "Sit Up", category_id: 27, movement_id: Some(47) },
    DictEntry { name: "russian twist", display_name: "Russian Twist", category_id: 5, movement_id: Some(58) },
    DictEntry { name: "mountain climber", display_name: "Mountain Climber", category_id: 19, movement_id: Some(38) },
    DictEntry { name: "leg raise", display_name: "Leg Raise", category_id: 16, movement_id: Some(19) },
    DictEntry { name: "hanging leg raise", display_name: "Hanging Leg Raise", category_id: 16, movement_id: Some(7) },
    DictEntry { name: "hip thrust", display_name: "Barbell Hip Thrust", category_id: 10, movement_id: Some(2) },
    DictEntry { name: "glute bridge", display_name: "Glute Bridge", category_id: 10, movement_id: Some(6) },
    DictEntry { name: "kettlebell swing", display_name: "Kettlebell Swing", category_id: 12, movement_id: Some(2) },
    DictEntry { name: "calf raise", display_name: "Calf Raise", category_id: 1, movement_id: Some(5) },
    DictEntry { name: "farmer carry", display_name: "Farmer's Carry", category_id: 3, movement_id: Some(1) },
    DictEntry { name: "farmers carry", display_name: "Farmer's Carry", category_id: 3, movement_id: Some(1) },
    DictEntry { name: "suitcase carry", display_name: "Suitcase Carry", category_id: 3, movement_id: None },
    DictEntry { name: "woodchop", display_name: "Cable Woodchop", category_id: 4, movement_id: None },
    DictEntry { name: "leg curl", display_name: "Leg Curl", category_id: 15, movement_id: Some(10) },
    DictEntry { name: "back extension", display_name: "Back Extension", category_id: 13, movement_id: Some(0) },
    DictEntry { name: "box jump", display_name: "Box Jump", category_id: 20, movement_id: Some(5) },
    DictEntry { name: "broad jump", display_name: "Broad Jump", category_id: 20, movement_id: None },
    DictEntry { name: "clean and jerk", display_name: "Clean and Jerk", category_id: 18, movement_id: Some(4) },
    DictEntry { name: "power clean", display_name: "Power Clean", category_id: 18, movement_id: Some(10) },
    DictEntry { name: "snatch", display_name: "Snatch", category_id: 18, movement_id: Some(14) },
    DictEntry { name: "thruster", display_name: "Thruster", category_id: 29, movement_id: None },
    DictEntry { name: "man maker", display_name: "Man Maker", category_id: 29, movement_id: None },
    DictEntry { name: "turkish get up", display_name: "Turkish Get Up", category_id: 29, movement_id: None },
    DictEntry { name: "bear crawl", display_name: "Bear Crawl", category_id: 29, movement_id: None },
    DictEntry { name: "shrug", display_name: "Barbell Shrug", category_id: 26, movement_id: Some(1) },
    DictEntry { name: "jumping jack", display_name: "Jumping Jack", category_id: 2, movement_id: None },
    DictEntry { name: "high knees", display_name: "High Knees", category_id: 2, movement_id: None },
    // Extended-category entries; collapsed on lookup by validate_category_id
    DictEntry { name: "battle rope", display_name: "Battle Rope", category_id: 33, movement_id: None },
    DictEntry { name: "jacobs ladder", display_name: "Jacobs Ladder", category_id: 36, movement_id: None },
    DictEntry { name: "sled push", display_name: "Sled Push", category_id: 40, movement_id: None },
    DictEntry { name: "tire flip", display_name: "Tire Flip", category_id: 41, movement_id: None },
];

/// Dictionary entries in a stable order (used for similarity scans)
pub fn dictionary_entries() -> &'static [DictEntry] {
    EXERCISE_DICTIONARY
}

static DICTIONARY_INDEX: Lazy<HashMap<&'static str, &'static DictEntry>> = Lazy::new(|| {
    EXERCISE_DICTIONARY
        .iter()
        .map(|entry| (entry.name, entry))
        .collect()
});

/// Exact lookup by normalized name
pub fn dictionary_lookup(normalized: &str) -> Option<&'static DictEntry> {
    DICTIONARY_INDEX.get(normalized).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids_pass_unchanged() {
        for id in 0..=32u16 {
            assert_eq!(u16::from(validate_category_id(id)), id);
        }
    }

    #[test]
    fn test_remap_table_targets_are_valid() {
        for (extended, _) in EXTENDED_CATEGORY_REMAP {
            let remapped = validate_category_id(extended);
            assert!(remapped <= MAX_VALID_CATEGORY_ID);
        }
    }

    #[test]
    fn test_cardio_extensions_collapse_to_cardio() {
        for extended in [33, 34, 35, 36, 37, 38] {
            assert_eq!(validate_category_id(extended), CATEGORY_CARDIO);
        }
    }

    #[test]
    fn test_strength_extensions_collapse_to_total_body() {
        for extended in [39, 40, 41, 42, 43] {
            assert_eq!(validate_category_id(extended), CATEGORY_TOTAL_BODY);
        }
    }

    #[test]
    fn test_unknown_extended_id_collapses_to_total_body() {
        assert_eq!(validate_category_id(99), CATEGORY_TOTAL_BODY);
        assert_eq!(validate_category_id(1000), CATEGORY_TOTAL_BODY);
    }

    #[test]
    fn test_validation_is_idempotent() {
        for id in [0u16, 5, 32, 33, 40, 99] {
            let once = validate_category_id(id);
            let twice = validate_category_id(u16::from(once));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(category_label(CATEGORY_CARDIO), "Cardio");
        assert_eq!(category_label(CATEGORY_CORE), "Core");
        assert_eq!(category_label(CATEGORY_RUN), "Run");
        assert_eq!(category_label(200), "Exercise");
    }

    #[test]
    fn test_dictionary_keys_are_normalized_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in dictionary_entries() {
            assert_eq!(entry.name, entry.name.to_lowercase());
            assert!(seen.insert(entry.name), "duplicate key {}", entry.name);
        }
    }

    #[test]
    fn test_exact_lookup() {
        let entry = dictionary_lookup("goblet squat").unwrap();
        assert_eq!(entry.display_name, "Goblet Squat");
        assert_eq!(entry.category_id, 28);
        assert_eq!(entry.movement_id, Some(37));

        assert!(dictionary_lookup("no such movement").is_none());
    }
}
