//! Score-block extraction from interview transcripts.
//!
//! At the end of a session the conversational agent is instructed to embed a
//! one-line JSON evaluation between two fixed sentinel markers inside its
//! otherwise free-form closing remarks. This crate locates that block in the
//! frozen transcript and parses it into a [`ScoreBlock`].
//!
//! Extraction is a pure function of the transcript text: no shared state, no
//! side effects beyond logging, identical output for identical input. A
//! transcript with no block, or with a block that fails to parse, yields
//! `None` — both are expected outcomes, not errors.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};
use viva_types::ScoreBlock;

/// Marker the agent emits immediately before the JSON evaluation.
pub const SCORES_START: &str = "###SCORES_JSON###";

/// Marker the agent emits immediately after the JSON evaluation.
pub const SCORES_END: &str = "###END_SCORES###";

/// Compiled once; `(?s)` lets the captured span include line breaks, and the
/// non-greedy group stops at the first end marker after the first start
/// marker, so only the leftmost sentinel pair is ever considered.
static SCORE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(SCORES_START),
        regex::escape(SCORES_END)
    ))
    .expect("score block pattern is valid")
});

/// Scans `transcript` for the first sentinel-delimited score block and parses
/// it into a [`ScoreBlock`].
///
/// Returns `None` when no block is present (logged at info — the agent may
/// legitimately never have produced one) or when the block's contents are
/// not valid JSON for the expected shape (logged at warn). Keys absent from
/// the JSON object default to `0` / `""`; unrecognized keys are ignored.
pub fn extract_scores(transcript: &str) -> Option<ScoreBlock> {
    let captures = match SCORE_BLOCK_RE.captures(transcript) {
        Some(c) => c,
        None => {
            info!(
                transcript_chars = transcript.len(),
                "no score block found in transcript"
            );
            return None;
        }
    };

    let raw = captures.get(1).map_or("", |m| m.as_str());

    match serde_json::from_str::<ScoreBlock>(raw.trim()) {
        Ok(block) => Some(block),
        Err(e) => {
            warn!(
                span_chars = raw.len(),
                "score block present but malformed, discarding: {}", e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"Thank you for your time. The interview has now concluded.
###SCORES_JSON###{"fluency":8,"grammar":7,"communication":9,"confidence":6,"correctness":8,"overall":8,"feedback":"Good job."}###END_SCORES###"#;

    #[test]
    fn extracts_well_formed_block() {
        let block = extract_scores(WELL_FORMED).unwrap();
        assert_eq!(block.fluency, 8);
        assert_eq!(block.grammar, 7);
        assert_eq!(block.communication, 9);
        assert_eq!(block.confidence, 6);
        assert_eq!(block.correctness, 8);
        assert_eq!(block.overall, 8);
        assert_eq!(block.feedback, "Good job.");
    }

    #[test]
    fn absent_key_defaults_to_zero() {
        let transcript = r#"###SCORES_JSON###{"fluency":8,"grammar":7,"communication":9,"correctness":8,"overall":8,"feedback":"ok"}###END_SCORES###"#;
        let block = extract_scores(transcript).unwrap();
        assert_eq!(block.confidence, 0);
        assert_eq!(block.fluency, 8);
        assert_eq!(block.overall, 8);
    }

    #[test]
    fn no_sentinels_yields_none() {
        assert!(extract_scores("Good morning. Please introduce yourself.").is_none());
        assert!(extract_scores("").is_none());
    }

    #[test]
    fn unterminated_block_yields_none() {
        let transcript = r#"closing remarks ###SCORES_JSON###{"fluency":8}"#;
        assert!(extract_scores(transcript).is_none());
    }

    #[test]
    fn end_marker_before_start_yields_none() {
        let transcript = r#"###END_SCORES### and later ###SCORES_JSON###{"fluency":8}"#;
        assert!(extract_scores(transcript).is_none());
    }

    #[test]
    fn malformed_json_yields_none() {
        let transcript = "###SCORES_JSON###{not json at all###END_SCORES###";
        assert!(extract_scores(transcript).is_none());
    }

    #[test]
    fn non_integer_scores_yield_none() {
        let transcript = r#"###SCORES_JSON###{"fluency":8.5}###END_SCORES###"#;
        assert!(extract_scores(transcript).is_none());
    }

    #[test]
    fn only_first_block_is_used() {
        let transcript = r#"###SCORES_JSON###{"overall":3}###END_SCORES### filler ###SCORES_JSON###{"overall":9}###END_SCORES###"#;
        let block = extract_scores(transcript).unwrap();
        assert_eq!(block.overall, 3);
    }

    #[test]
    fn block_may_span_lines() {
        let transcript = "###SCORES_JSON###\n{\"fluency\": 7,\n \"overall\": 6}\n###END_SCORES###";
        let block = extract_scores(transcript).unwrap();
        assert_eq!(block.fluency, 7);
        assert_eq!(block.overall, 6);
    }

    #[test]
    fn block_embedded_mid_text_is_found() {
        let transcript = format!(
            "Closing now. {}{}{} Have a good day.",
            SCORES_START, r#"{"overall":5,"feedback":"Fair."}"#, SCORES_END
        );
        let block = extract_scores(&transcript).unwrap();
        assert_eq!(block.overall, 5);
        assert_eq!(block.feedback, "Fair.");
    }

    #[test]
    fn extraction_is_idempotent() {
        let first = extract_scores(WELL_FORMED);
        let second = extract_scores(WELL_FORMED);
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
