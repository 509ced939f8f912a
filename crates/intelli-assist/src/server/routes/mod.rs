//! API routes for the assistant server

pub mod ask;
pub mod pages;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// HTML form pages
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/ask", post(pages::ask))
}

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/memory/stats", get(ask::memory_stats))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let config = state.config();
    axum::Json(serde_json::json!({
        "name": "intelli-assist",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Personal assistant with symptom triage, place lookup and a self-reinforcing answer memory",
        "memory_path": config.memory.path,
        "features": {
            "online_summaries": config.summary.enabled,
            "semantic_similarity": config.embeddings.enabled
        },
        "endpoints": {
            "GET /": "Query form",
            "POST /ask": "Query form submission",
            "POST /api/ask": "Classify and answer a query",
            "GET /api/memory/stats": "Answer memory statistics",
            "GET /api/info": "This document"
        }
    }))
}
