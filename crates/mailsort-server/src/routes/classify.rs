//! Classification routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use mailsort_classify::{classify_messages_detailed, Strategy};
use mailsort_core::Error;
use tracing::{debug, warn};

use super::error_response;
use crate::protocol::{ClassifyRequest, ClassifyResponse};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/classify/rules", post(classify_rules))
        .route("/classify/similarity", post(classify_similarity))
}

async fn classify_rules(Json(body): Json<ClassifyRequest>) -> impl IntoResponse {
    debug!("Rule classification of {} messages", body.messages.len());
    match classify_messages_detailed(&body.messages, Strategy::Rule) {
        Ok(results) => (
            StatusCode::OK,
            Json(serde_json::json!(ClassifyResponse::new("rules", results))),
        ),
        Err(e) => error_response(&e),
    }
}

async fn classify_similarity(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ClassifyRequest>,
) -> impl IntoResponse {
    debug!("Similarity classification of {} messages", body.messages.len());

    let outcome = tokio::task::spawn_blocking(move || {
        let custom = body.taxonomy();
        let taxonomy = custom.as_ref().unwrap_or(&state.taxonomy);
        let strategy = Strategy::Similarity {
            classifier: &state.classifier,
            taxonomy,
        };
        classify_messages_detailed(&body.messages, strategy)
    })
    .await
    .unwrap_or_else(|e| Err(Error::Inference(format!("Classification task failed: {}", e))));

    match outcome {
        Ok(results) => (
            StatusCode::OK,
            Json(serde_json::json!(ClassifyResponse::new("similarity", results))),
        ),
        Err(e) => {
            warn!("Similarity classification failed: {}", e);
            error_response(&e)
        }
    }
}
