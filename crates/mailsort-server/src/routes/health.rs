//! Health and taxonomy routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(get_health))
        .route("/taxonomy", get(get_taxonomy))
}

/// GET /api/health — service and embedder status.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let embedder = state.classifier.embedder();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mailsort",
        "version": env!("CARGO_PKG_VERSION"),
        "embedder": {
            "model": embedder.model_name(),
            "dimension": embedder.dimension(),
            "available": embedder.is_available(),
        },
        "categories": state.taxonomy.len(),
    }))
}

/// GET /api/taxonomy — the default category set.
async fn get_taxonomy(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "categories": state.taxonomy,
        "total": state.taxonomy.len(),
    }))
}
