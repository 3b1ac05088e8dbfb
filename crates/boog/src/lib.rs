//! `boog` crate (library surface).
//!
//! The primary entrypoint is the `boog` binary. The HTTP router lives here so it can be
//! embedded and exercised without spawning the process.

pub use boog_core as core;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use boog_core::{ChatRequest, ChatResponse};
use boog_local::orchestrator::MAX_MESSAGE_CHARS;
use boog_local::{ChatLog, Orchestrator};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub log: Option<ChatLog>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, log: Option<ChatLog>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            log,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Oversized messages get a chat answer, not a 413.
        .route("/chat", post(chat).layer(DefaultBodyLimit::disable()))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Always answers 200; a body that is not a chat request is treated as an empty message.
async fn chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let req: ChatRequest = serde_json::from_slice(&body).unwrap_or_default();
    let resp = state.orchestrator.handle(&req).await;

    if let Some(log) = state.log.clone() {
        let user = boog_core::truncate_chars(req.message.trim(), MAX_MESSAGE_CHARS).to_string();
        let boog = resp.response.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || log.record(&user, &boog)).await {
            tracing::warn!(error = %e, "chat log task failed");
        }
    }

    Json(resp)
}
