//! Name-to-category resolution.
//!
//! Maps free-text exercise names onto the bounded category taxonomy using
//! layered strategies, in strict priority order:
//!
//! 1. Built-in keywords (checked before exact matches so that ambiguous
//!    device-category choices stay consistent for mixed workouts)
//! 2. Exact dictionary match on the normalized name
//! 3. Secondary keyword match
//! 4. String-similarity match against all dictionary keys
//! 5. Default fallback to the Core category
//!
//! Resolution never fails; unknown names degrade to the fallback with zero
//! confidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::taxonomy::{
    self, category_label, dictionary_entries, dictionary_lookup, validate_category_id,
    BUILTIN_KEYWORDS, KEYWORDS_EN,
};

/// Which strategy produced a resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    BuiltinKeyword,
    Exact,
    Keyword,
    Similarity,
    Default,
}

/// Result of resolving one exercise name
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCategory {
    /// Always within the valid range after validation
    pub category_id: u8,
    pub category_label: &'static str,
    /// The taxonomy's preferred display name, when the matching layer has one
    pub canonical_name: Option<String>,
    /// Device movement id within the category, when known
    pub movement_id: Option<u16>,
    pub kind: MatchKind,
    /// 1.0 for table hits, the similarity score for similarity matches,
    /// 0.0 for the default fallback
    pub confidence: f64,
}

static SPEAKER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]\d+[;:\s]+").unwrap());
static MULTIPLIER_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*x\s*\d+.*$").unwrap());
static PER_SIDE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(each|per)\s+(side|arm|leg).*$").unwrap());
static TRAILING_DISTANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\d.]+\s*(m|km)\s*$").unwrap());
static LEADING_DISTANCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.]+\s*(m|km)\s+").unwrap());

const EQUIPMENT_PREFIXES: &[&str] = &[
    "db ", "kb ", "bb ", "sb ", "mb ", "trx ", "cable ", "band ",
];

/// Resolves free-text exercise names to categories.
///
/// Construct one per process and pass it by reference wherever names need
/// resolving; the underlying dictionaries are process-lifetime statics.
#[derive(Clone, Debug)]
pub struct CategoryResolver {
    similarity_threshold: f64,
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryResolver {
    pub fn new() -> Self {
        Self {
            similarity_threshold: 0.6,
        }
    }

    /// Normalize an exercise name for matching.
    ///
    /// Strips annotation prefixes ("A1:"), equipment abbreviations ("db "),
    /// rep multipliers ("x10"), per-side phrases and distance tokens.
    pub fn normalize(&self, name: &str) -> String {
        let mut name = name.to_lowercase().trim().to_string();
        name = name.trim_end_matches('|').trim().to_string();

        name = SPEAKER_PREFIX.replace(&name, "").into_owned();

        for prefix in EQUIPMENT_PREFIXES {
            if let Some(stripped) = name.strip_prefix(prefix) {
                name = stripped.to_string();
            }
        }

        name = MULTIPLIER_SUFFIX.replace(&name, "").into_owned();
        name = PER_SIDE_SUFFIX.replace(&name, "").into_owned();
        name = TRAILING_DISTANCE.replace(&name, "").into_owned();
        name = LEADING_DISTANCE.replace(&name, "").into_owned();

        name.trim().to_string()
    }

    /// Resolve a free-text exercise name to a category.
    pub fn resolve(&self, name: &str) -> ResolvedCategory {
        let normalized = self.normalize(name);

        // 1. Built-in keywords take precedence over everything, including
        //    exact matches.
        for entry in BUILTIN_KEYWORDS {
            if !normalized.is_empty() && normalized.contains(entry.keyword) {
                let category_id = validate_category_id(entry.category_id);
                tracing::debug!(
                    name,
                    keyword = entry.keyword,
                    category_id,
                    "resolved via builtin keyword"
                );
                return ResolvedCategory {
                    category_id,
                    category_label: category_label(category_id),
                    canonical_name: entry.display_name.map(String::from),
                    movement_id: None,
                    kind: MatchKind::BuiltinKeyword,
                    confidence: 1.0,
                };
            }
        }

        // 2. Exact dictionary match
        if let Some(entry) = dictionary_lookup(&normalized) {
            let category_id = validate_category_id(entry.category_id);
            return ResolvedCategory {
                category_id,
                category_label: category_label(category_id),
                canonical_name: Some(entry.display_name.to_string()),
                movement_id: entry.movement_id,
                kind: MatchKind::Exact,
                confidence: 1.0,
            };
        }

        // 3. Secondary keyword match
        for entry in KEYWORDS_EN {
            if !normalized.is_empty() && normalized.contains(entry.keyword) {
                let category_id = validate_category_id(entry.category_id);
                tracing::debug!(
                    name,
                    keyword = entry.keyword,
                    category_id,
                    "resolved via keyword"
                );
                return ResolvedCategory {
                    category_id,
                    category_label: category_label(category_id),
                    canonical_name: entry.display_name.map(String::from),
                    movement_id: None,
                    kind: MatchKind::Keyword,
                    confidence: 1.0,
                };
            }
        }

        // 4. Similarity match. Ties break deterministically: shortest
        //    normalized key first, then lexicographic order.
        if let Some((entry, score)) = self.best_similarity(&normalized) {
            let category_id = validate_category_id(entry.category_id);
            tracing::debug!(name, key = entry.name, score, "resolved via similarity");
            return ResolvedCategory {
                category_id,
                category_label: category_label(category_id),
                canonical_name: Some(entry.display_name.to_string()),
                movement_id: entry.movement_id,
                kind: MatchKind::Similarity,
                confidence: score,
            };
        }

        // 5. Default fallback
        tracing::warn!(name, "no match; using default category");
        ResolvedCategory {
            category_id: taxonomy::CATEGORY_CORE,
            category_label: category_label(taxonomy::CATEGORY_CORE),
            canonical_name: None,
            movement_id: None,
            kind: MatchKind::Default,
            confidence: 0.0,
        }
    }

    fn best_similarity(&self, normalized: &str) -> Option<(&'static taxonomy::DictEntry, f64)> {
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(&taxonomy::DictEntry, f64)> = None;
        for entry in dictionary_entries() {
            let score = strsim::normalized_levenshtein(normalized, entry.name);
            if score <= self.similarity_threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && (entry.name.len() < current.name.len()
                                || (entry.name.len() == current.name.len()
                                    && entry.name < current.name)))
                }
            };
            if better {
                best = Some((entry, score));
            }
        }
        best
    }
}
