//! Score delivery to the backend store and the live channel.
//!
//! Two attempts, always both, always in the same order: the durable backend
//! submission first, then the best-effort broadcast to whoever is still on
//! the session channel. Each failure is logged where it happens and isolated
//! from the other attempt; nothing propagates to the caller and nothing
//! retries.

use crate::events::LiveMessage;
use tokio::sync::mpsc;
use tracing::{info, warn};
use viva_backend::{BackendClient, ScoreSubmission};
use viva_types::ScoreBlock;

/// Result of one delivery attempt. Logged, never retried or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed { cause: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Outcomes of both delivery channels for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub backend: DeliveryOutcome,
    pub broadcast: DeliveryOutcome,
}

/// Delivers one extracted score record: backend submission, then broadcast.
///
/// The submission is bounded by the client's timeout; a non-success status or
/// transport error is terminal for that attempt. The broadcast runs
/// regardless of the submission outcome and is abandoned with a warning when
/// the channel is closed or full (the peer may already be gone).
pub async fn deliver_scores(
    backend: &BackendClient,
    room_name: &str,
    scores: ScoreBlock,
    live_tx: &mpsc::Sender<String>,
) -> DeliveryReport {
    // 1. Durable path first.
    let submission = ScoreSubmission::new(room_name, &scores);
    let backend_outcome = match backend.submit_scores(&submission).await {
        Ok(()) => {
            info!(room = %room_name, overall = scores.overall, "scores submitted to backend");
            DeliveryOutcome::Delivered
        }
        Err(e) => {
            warn!(room = %room_name, "score submission failed, dropping: {}", e);
            DeliveryOutcome::Failed {
                cause: e.to_string(),
            }
        }
    };

    // 2. Best-effort broadcast, independent of step 1.
    let broadcast_outcome = match serde_json::to_string(&LiveMessage::Scores { scores }) {
        Ok(json) => match live_tx.try_send(json) {
            Ok(()) => {
                info!(room = %room_name, "scores broadcast on live channel");
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                warn!(room = %room_name, "score broadcast failed, peer likely gone: {}", e);
                DeliveryOutcome::Failed {
                    cause: e.to_string(),
                }
            }
        },
        Err(e) => {
            warn!(room = %room_name, "failed to serialize score broadcast: {}", e);
            DeliveryOutcome::Failed {
                cause: e.to_string(),
            }
        }
    };

    DeliveryReport {
        backend: backend_outcome,
        broadcast: broadcast_outcome,
    }
}
