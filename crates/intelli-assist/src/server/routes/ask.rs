//! Query endpoint: classify and answer

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assistant::Reply;
use crate::error::{Error, Result};
use crate::intent::Intent;
use crate::learning::MemoryStats;
use crate::server::state::AppState;

/// Query request
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// Query response
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub intent: Intent,
    /// Plain-text rendering of the reply
    pub answer: String,
    /// Structured handler output
    pub reply: Reply,
    pub processing_time_ms: u64,
}

/// POST /api/ask - Classify and answer a query
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidQuery("query must not be empty".to_string()));
    }

    let start = Instant::now();
    tracing::info!("Query: \"{}\"", query);

    let reply = state.assistant().respond(query).await;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Answered {} query in {}ms",
        reply.intent(),
        processing_time_ms
    );

    Ok(Json(AskResponse {
        intent: reply.intent(),
        answer: reply.to_text(),
        reply,
        processing_time_ms,
    }))
}

/// GET /api/memory/stats - Answer memory statistics
pub async fn memory_stats(State(state): State<AppState>) -> Json<MemoryStats> {
    Json(state.assistant().memory_stats().await)
}
