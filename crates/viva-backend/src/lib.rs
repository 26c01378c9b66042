//! HTTP client for the viva backend store.
//!
//! Two operations cross this boundary: reading a candidate's profile before
//! the conversation starts, and writing the extracted interview scores after
//! it ends. Transport methods return `Result` so callers apply the documented
//! log-and-continue policy explicitly — nothing in this crate swallows a
//! failure on its own.

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use viva_types::{CandidateProfile, ScoreBlock};

/// Default timeout for the score submission request.
///
/// Profile fetches deliberately carry no explicit timeout; the transport
/// default applies there.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from backend requests.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed: connection refused, timeout, DNS, TLS.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: StatusCode },
}

/// The score record as the backend's `/interviews/scores` endpoint expects
/// it: camelCase keys, room name alongside the six categories and feedback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub room_name: String,
    pub fluency_score: i64,
    pub grammar_score: i64,
    pub communication_score: i64,
    pub confidence_score: i64,
    pub correctness_score: i64,
    pub overall_score: i64,
    pub feedback: String,
}

impl ScoreSubmission {
    pub fn new(room_name: impl Into<String>, scores: &ScoreBlock) -> Self {
        Self {
            room_name: room_name.into(),
            fluency_score: scores.fluency,
            grammar_score: scores.grammar,
            communication_score: scores.communication,
            confidence_score: scores.confidence,
            correctness_score: scores.correctness,
            overall_score: scores.overall,
            feedback: scores.feedback.clone(),
        }
    }
}

/// Client for the backend store, cheap to clone (reqwest pools internally).
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    submit_timeout: Duration,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            submit_timeout: SUBMIT_TIMEOUT,
        }
    }

    /// Overrides the submission timeout. Production keeps the 10 s default;
    /// tests shrink it to exercise the timeout path quickly.
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// `GET {base_url}/students/profile` with bearer auth.
    ///
    /// The backend derives the student from the token, so the token is the
    /// only input. No explicit timeout is set; the transport default applies.
    pub async fn fetch_profile(&self, token: &str) -> Result<CandidateProfile, BackendError> {
        let resp = self
            .http
            .get(format!("{}/students/profile", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BackendError::Status {
                status: resp.status(),
            });
        }

        Ok(resp.json::<CandidateProfile>().await?)
    }

    /// `POST {base_url}/interviews/scores` with the camelCase payload.
    ///
    /// One attempt, bounded by the submission timeout. Callers decide what a
    /// failure means; this method never retries.
    pub async fn submit_scores(&self, submission: &ScoreSubmission) -> Result<(), BackendError> {
        let resp = self
            .http
            .post(format!("{}/interviews/scores", self.base_url))
            .timeout(self.submit_timeout)
            .json(submission)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BackendError::Status {
                status: resp.status(),
            });
        }

        Ok(())
    }
}

/// Resolves a candidate's profile, degrading to the empty document on every
/// failure path. This function never fails: a profile outage must not abort
/// the session it feeds.
///
/// Without a token no request is issued at all — the backend cannot identify
/// the candidate, so the empty profile is returned synchronously.
pub async fn resolve_profile(
    client: &BackendClient,
    candidate_id: &str,
    token: Option<&str>,
) -> CandidateProfile {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => {
            info!(candidate = %candidate_id, "no token provided, using empty profile");
            return CandidateProfile::default();
        }
    };

    match client.fetch_profile(token).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(candidate = %candidate_id, "profile fetch failed, using empty profile: {}", e);
            CandidateProfile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_serializes_with_camel_case_keys() {
        let scores = ScoreBlock {
            fluency: 8,
            grammar: 7,
            communication: 9,
            confidence: 6,
            correctness: 8,
            overall: 8,
            feedback: "Good job.".to_string(),
        };
        let submission = ScoreSubmission::new("interview-1700000000-stu42", &scores);
        let json: serde_json::Value = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["roomName"], "interview-1700000000-stu42");
        assert_eq!(json["fluencyScore"], 8);
        assert_eq!(json["grammarScore"], 7);
        assert_eq!(json["communicationScore"], 9);
        assert_eq!(json["confidenceScore"], 6);
        assert_eq!(json["correctnessScore"], 8);
        assert_eq!(json["overallScore"], 8);
        assert_eq!(json["feedback"], "Good job.");
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn submission_carries_defaulted_fields() {
        let submission = ScoreSubmission::new("room", &ScoreBlock::default());
        let json: serde_json::Value = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["overallScore"], 0);
        assert_eq!(json["feedback"], "");
    }
}
