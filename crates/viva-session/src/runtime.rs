//! The per-session driver: collect, freeze, extract, deliver.

use crate::delivery::{deliver_scores, DeliveryReport};
use crate::events::SessionEvent;
use crate::transcript::TranscriptAccumulator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;
use viva_backend::BackendClient;

/// Everything one session needs, owned by its task. Sessions share the
/// backend client (connection pool) and nothing else.
#[derive(Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub room_name: String,
    pub backend: Arc<BackendClient>,
    /// The session's live channel, drained by the socket forward task.
    pub live_tx: mpsc::Sender<String>,
}

/// Derives the candidate identifier from the room name.
///
/// Rooms are named `interview-{timestamp}-{candidateId}`; the identifier is
/// the segment after the last `-`, or empty when the name has none.
pub fn candidate_id_from_room(room: &str) -> &str {
    room.rsplit_once('-').map_or("", |(_, id)| id)
}

/// Runs one session to completion.
///
/// Drains the event queue into the transcript until `session_ended` arrives
/// or the queue closes (the peer vanished — extraction still runs, since the
/// score was already spoken into the transcript). The transcript is then
/// frozen exactly once, extraction runs exactly once, and delivery runs only
/// when extraction produced a record.
///
/// Returns `None` when no score was found; the report otherwise. Either way
/// nothing here fails: every delivery error is absorbed and logged.
pub async fn run_session(
    ctx: SessionContext,
    mut events: mpsc::Receiver<SessionEvent>,
) -> Option<DeliveryReport> {
    let mut accumulator = TranscriptAccumulator::new();

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::UtteranceCommitted { text } => accumulator.append(text),
            SessionEvent::SessionEnded => {
                debug!(session = %ctx.session_id, "session ended by peer");
                break;
            }
        }
    }

    info!(
        session = %ctx.session_id,
        room = %ctx.room_name,
        segments = accumulator.len(),
        "session over, freezing transcript"
    );

    let transcript = accumulator.drain();
    let scores = viva_score::extract_scores(&transcript)?;

    Some(deliver_scores(&ctx.backend, &ctx.room_name, scores, &ctx.live_tx).await)
}
