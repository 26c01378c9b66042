//! Viva agent worker library: application state and router.
//!
//! The binary in `main.rs` wires configuration and logging around [`app`];
//! integration tests call [`app`] directly against a mock backend.

pub mod config;
pub mod ws;

use axum::{routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use viva_backend::BackendClient;

/// Application state shared across all session handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the backend store, shared by all sessions.
    pub backend: Arc<BackendClient>,
}

/// Health check handler.
///
/// Returns `200 OK` with worker status and version. Used by monitoring and
/// CI to verify the worker is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws::session_handler))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
