//! Decoded message records, as handed over by the decoding collaborator.
//!
//! The collaborator owns the byte layout; by the time records arrive here
//! they are named-field values tagged with their record type. This module
//! only groups them and gives decode failures an explicit error instead of
//! a silent empty result.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File-level metadata record
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FileMetaRecord {
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Producing application or device, when the decoder recovered one
    #[serde(default)]
    pub product: Option<String>,
}

/// Workout-level metadata record
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkoutMetaRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub sub_sport: Option<String>,
}

/// A title record naming one (category, exercise id) pair
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TitleRecord {
    #[serde(default)]
    pub category_id: Option<u16>,
    #[serde(default)]
    pub exercise_id: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Step intensity as read back from storage
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordIntensity {
    Active,
    Rest,
    Warmup,
    Cooldown,
}

/// One step record as read back from storage
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_id: Option<u16>,
    #[serde(default)]
    pub exercise_id: Option<u16>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub distance_m: Option<f64>,
    #[serde(default)]
    pub intensity: Option<RecordIntensity>,
    /// Present only on repeat-marker records: additional repeats of the
    /// referenced range
    #[serde(default)]
    pub repeat_count: Option<u32>,
    /// Index of the first step of the repeated range, when recorded
    #[serde(default)]
    pub target_step: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StepRecord {
    pub fn is_repeat(&self) -> bool {
        self.repeat_count.is_some()
    }

    pub fn is_rest(&self) -> bool {
        self.intensity == Some(RecordIntensity::Rest)
    }
}

/// One decoded record, tagged with its declared record type
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    FileMeta(FileMetaRecord),
    WorkoutMeta(WorkoutMetaRecord),
    Title(TitleRecord),
    Step(StepRecord),
}

/// All records of one artifact, grouped by record type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStream {
    pub file_meta: Option<FileMetaRecord>,
    pub workout_meta: Option<WorkoutMetaRecord>,
    pub titles: Vec<TitleRecord>,
    pub steps: Vec<StepRecord>,
}

impl RecordStream {
    /// Group a flat record sequence by record type, preserving step and
    /// title order. Later metadata records overwrite earlier ones.
    pub fn group(records: Vec<Record>) -> Self {
        let mut stream = RecordStream::default();
        for record in records {
            match record {
                Record::FileMeta(meta) => stream.file_meta = Some(meta),
                Record::WorkoutMeta(meta) => stream.workout_meta = Some(meta),
                Record::Title(title) => stream.titles.push(title),
                Record::Step(step) => stream.steps.push(step),
            }
        }
        stream
    }
}

/// Parse a JSON record dump produced by the decoding collaborator.
///
/// Returns an explicit decode error on malformed input so callers can tell
/// "empty workout" apart from "could not interpret".
pub fn parse_records(json: &str) -> Result<RecordStream> {
    let records: Vec<Record> = serde_json::from_str(json)
        .map_err(|e| Error::Decode(format!("unreadable record stream: {e}")))?;
    Ok(RecordStream::group(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_preserves_step_order() {
        let records = vec![
            Record::WorkoutMeta(WorkoutMetaRecord {
                name: Some("Morning".into()),
                ..WorkoutMetaRecord::default()
            }),
            Record::Step(StepRecord {
                name: Some("A".into()),
                ..StepRecord::default()
            }),
            Record::Step(StepRecord {
                name: Some("B".into()),
                ..StepRecord::default()
            }),
        ];
        let stream = RecordStream::group(records);
        assert_eq!(stream.workout_meta.unwrap().name.as_deref(), Some("Morning"));
        assert_eq!(stream.steps.len(), 2);
        assert_eq!(stream.steps[0].name.as_deref(), Some("A"));
    }

    #[test]
    fn test_parse_records_roundtrip() {
        let json = r#"[
            {"record": "file_meta", "manufacturer": "development"},
            {"record": "workout_meta", "name": "Intervals", "sport": "training"},
            {"record": "title", "category_id": 28, "exercise_id": 0, "name": "Air Squat"},
            {"record": "step", "category_id": 28, "exercise_id": 0, "reps": 10, "intensity": "active"}
        ]"#;
        let stream = parse_records(json).unwrap();
        assert!(stream.file_meta.is_some());
        assert_eq!(stream.titles.len(), 1);
        assert_eq!(stream.steps.len(), 1);
        assert_eq!(stream.steps[0].reps, Some(10));
    }

    #[test]
    fn test_parse_records_reports_decode_error() {
        let result = parse_records("not json at all");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_repeat_record_detection() {
        let step = StepRecord {
            repeat_count: Some(2),
            target_step: Some(0),
            ..StepRecord::default()
        };
        assert!(step.is_repeat());
        assert!(!step.is_rest());
    }
}
