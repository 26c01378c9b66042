//! WebSocket session ingest.
//!
//! One connection per interview session. The conversational runtime connects
//! with the room name (and optionally the candidate's token), receives the
//! personalized instructions, streams committed utterances as the interview
//! runs, and — if a score block was spoken — gets the extracted scores back
//! on the same socket before it closes.

use crate::AppState;
use axum::{
    extract::{
        ws::{Message as AxumMessage, WebSocket},
        Extension, Query, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;
use viva_backend::resolve_profile;
use viva_session::{
    build_interview_prompt, candidate_id_from_room, run_session, LiveMessage, SessionContext,
    SessionEvent,
};

/// Bounded capacity of the per-session outbound queue. A consumer that falls
/// this far behind is too slow; further frames are dropped.
const LIVE_QUEUE_CAPACITY: usize = 256;

/// Bounded capacity of the per-session inbound event queue.
const EVENT_QUEUE_CAPACITY: usize = 256;

/// Query parameters for the session connect.
#[derive(Debug, Deserialize)]
pub struct SessionConnectParams {
    /// Room name, `interview-{timestamp}-{candidateId}`. Required.
    pub room: Option<String>,
    /// Candidate's bearer token for the profile lookup. Optional; without it
    /// the session runs against an empty profile.
    pub token: Option<String>,
}

/// WebSocket upgrade handler for `GET /ws`.
///
/// Rejects the connection with `400 Bad Request` before upgrading when the
/// room name is missing or blank; everything after the upgrade degrades
/// gracefully instead of failing.
pub async fn session_handler(
    Extension(state): Extension<Arc<AppState>>,
    ws: WebSocketUpgrade,
    Query(params): Query<SessionConnectParams>,
) -> impl IntoResponse {
    let room = match params.room {
        Some(r) if !r.trim().is_empty() => r,
        _ => {
            tracing::warn!("session connect rejected: missing room name");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_session(socket, state, room, params.token))
}

/// Drives one interview session over its socket.
async fn handle_session(
    socket: WebSocket,
    state: Arc<AppState>,
    room: String,
    token: Option<String>,
) {
    let session_id = Uuid::new_v4();
    tracing::info!(session = %session_id, room = %room, "session connected");

    let (mut sender, mut receiver) = socket.split();

    // Bounded live channel for this session; a forward task drains it into
    // the socket so senders never await the peer.
    let (live_tx, mut live_rx) = mpsc::channel::<String>(LIVE_QUEUE_CAPACITY);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = live_rx.recv().await {
            if sender.send(AxumMessage::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Conversation setup: profile lookup degrades to the empty document, so
    // the session_ready frame always goes out.
    let candidate_id = candidate_id_from_room(&room).to_string();
    let profile = resolve_profile(&state.backend, &candidate_id, token.as_deref()).await;
    let instructions = build_interview_prompt(&profile);
    send_live(&live_tx, &LiveMessage::SessionReady { instructions });

    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(EVENT_QUEUE_CAPACITY);
    let ctx = SessionContext {
        session_id,
        room_name: room.clone(),
        backend: state.backend.clone(),
        live_tx: live_tx.clone(),
    };
    let session_task = tokio::spawn(run_session(ctx, event_rx));

    while let Some(Ok(msg)) = receiver.next().await {
        if let AxumMessage::Text(text) = msg {
            match serde_json::from_str::<SessionEvent>(&text.to_string()) {
                Ok(event) => {
                    let ended = matches!(event, SessionEvent::SessionEnded);
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                    // The socket stays open past this point so the score
                    // broadcast can still reach the peer.
                    if ended {
                        break;
                    }
                }
                Err(_) => {
                    tracing::warn!(session = %session_id, "failed to parse inbound session frame");
                    send_live(
                        &live_tx,
                        &LiveMessage::Error {
                            message: "invalid message format".to_string(),
                        },
                    );
                }
            }
        } else if let AxumMessage::Close(_) = msg {
            break;
        }
    }

    // Closing the event queue ends the session loop even when the peer
    // vanished without a session_ended frame.
    drop(event_tx);

    match session_task.await {
        Ok(Some(report)) => tracing::info!(
            session = %session_id,
            room = %room,
            backend = ?report.backend,
            broadcast = ?report.broadcast,
            "session finished with score delivery"
        ),
        Ok(None) => tracing::info!(
            session = %session_id,
            room = %room,
            "session finished without a score"
        ),
        Err(e) => tracing::error!(session = %session_id, "session task failed: {}", e),
    }

    // Drop our live sender and let the forward task drain whatever is queued
    // (the score broadcast, typically) before the socket goes away.
    drop(live_tx);
    let _ = send_task.await;

    tracing::info!(session = %session_id, "session socket closed");
}

/// Sends a JSON-serialized live message over the session's sender channel.
fn send_live(tx: &mpsc::Sender<String>, message: &LiveMessage) {
    match serde_json::to_string(message) {
        Ok(json) => {
            if let Err(e) = tx.try_send(json) {
                tracing::warn!("failed to send live message to client: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("failed to serialize live message: {}", e);
        }
    }
}
