//! Shared domain types for the viva interview platform.
//!
//! This crate provides the types that cross crate boundaries: the extracted
//! score record and the candidate profile document. It deliberately contains
//! no I/O — every other viva crate depends on it and nothing else internal,
//! which keeps the dependency graph flat.

use serde::{Deserialize, Serialize};

mod profile;
pub use profile::{CandidateProfile, EducationEntry, InternshipEntry, ProjectEntry};

/// The structured evaluation a conversational agent embeds in its closing
/// remarks, recovered from the session transcript.
///
/// Every field defaults when absent from the parsed source: integer
/// categories to `0`, `feedback` to the empty string. Unknown keys in the
/// source object are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBlock {
    /// English fluency, 1–10.
    #[serde(default)]
    pub fluency: i64,
    /// Grammar correctness, 1–10.
    #[serde(default)]
    pub grammar: i64,
    /// Communication clarity, 1–10.
    #[serde(default)]
    pub communication: i64,
    /// Candidate confidence, 1–10.
    #[serde(default)]
    pub confidence: i64,
    /// Correctness of answers, 1–10.
    #[serde(default)]
    pub correctness: i64,
    /// Overall score, 1–10.
    #[serde(default)]
    pub overall: i64,
    /// One or two sentences of constructive feedback.
    #[serde(default)]
    pub feedback: String,
}
