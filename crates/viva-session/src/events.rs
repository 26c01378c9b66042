//! The session wire protocol: inbound events and outbound live messages.

use serde::{Deserialize, Serialize};
use viva_types::ScoreBlock;

/// Inbound session event, tagged by `type`.
///
/// `text` on `utterance_committed` always deserializes — a frame without the
/// field yields the empty string, which the accumulator then drops. There is
/// no optional-field probing anywhere downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "utterance_committed")]
    UtteranceCommitted {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "session_ended")]
    SessionEnded,
}

/// Outbound message on the session's live channel, tagged by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum LiveMessage {
    /// Sent once after connect: the personalized interview instructions.
    #[serde(rename = "session_ready")]
    SessionReady { instructions: String },
    /// The extracted evaluation, broadcast best-effort at session end.
    #[serde(rename = "interview_scores")]
    Scores { scores: ScoreBlock },
    #[serde(rename = "error")]
    Error { message: String },
}
