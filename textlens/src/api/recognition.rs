use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::client::RecognitionResponse;
use crate::error::{Result, TextLensError};

use super::state::RecognitionState;
use super::run_normalize;

pub fn recognition_router(state: RecognitionState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ocr", post(extract_text))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<RecognitionState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "ocr": { "available": state.ocr.is_available() },
    }))
}

/// `POST /ocr`
///
/// Takes `{"file_path": <name>}` referencing a file in shared storage.
/// The referenced asset is re-normalized before recognition regardless of
/// what the sender claims about it — this side of the boundary never
/// trusts that normalization already happened.
async fn extract_text(
    State(state): State<RecognitionState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<RecognitionResponse>> {
    let file_path = payload
        .get("file_path")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if file_path.is_empty() {
        error!("no file path provided in recognition request");
        return Err(TextLensError::InvalidRequest(
            "No file path provided".to_string(),
        ));
    }

    let path = state.storage.resolve(file_path)?;
    debug!(file = %path.display(), "recognition request received");

    let normalized = run_normalize(&state.normalize_pool, path).await?;

    let bytes = tokio::fs::read(normalized.asset().path()).await?;
    let extracted_text = state.ocr.recognize(&bytes).await?;

    info!(
        file = %file_path,
        format = %normalized.asset().format(),
        chars = extracted_text.len(),
        "recognition complete"
    );
    Ok(Json(RecognitionResponse { extracted_text }))
}
