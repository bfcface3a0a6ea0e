#![forbid(unsafe_code)]

//! Core domain model and business logic for the stepsmith workout compiler.
//!
//! This crate provides:
//! - Domain types (workout tree, compiled steps, sport classification)
//! - Name-to-category resolution over a bounded taxonomy
//! - Step compilation and decompilation
//! - Export shaping (emission plan and preview)

pub mod types;
pub mod error;
pub mod taxonomy;
pub mod resolver;
pub mod rest;
pub mod compiler;
pub mod sport;
pub mod records;
pub mod decompiler;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use taxonomy::validate_category_id;
pub use resolver::{CategoryResolver, MatchKind, ResolvedCategory};
pub use compiler::{compile, CompileOptions, CompiledProgram, TitleEntry};
pub use sport::{classify, ForcedSport, Sport, SportClassification, SubSport};
pub use records::{parse_records, Record, RecordStream};
pub use decompiler::{decompile, validate_stream, DecompiledWorkout, ValidationReport};
pub use export::{export, preview, EmissionPlan, ExportBundle, ExportOptions, PreviewSummary};
pub use config::Config;
