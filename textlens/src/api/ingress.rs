use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::client::RecognitionResponse;
use crate::error::{Result, TextLensError};
use crate::storage::claimed_extension;

use super::state::IngressState;
use super::run_normalize;

/// `POST /upload` success envelope.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub data: RecognitionResponse,
}

pub fn ingress_router(state: IngressState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Leave headroom above the configured file cap for multipart framing;
    // the per-file limit is enforced in the handler.
    let body_limit = state.config.upload.max_file_size + 64 * 1024;

    Router::new()
        .route("/upload", post(upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /upload`
///
/// Accepts a multipart form with a `file` field. The claimed filename is
/// checked against the extension allow-list before any content
/// inspection; content-based classification downstream corrects a
/// mismatched-but-allowed extension. On success the normalized asset is
/// relayed by reference to the recognition service and its outcome is
/// propagated verbatim.
async fn upload(
    State(state): State<IngressState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            if let Some(name) = field.file_name() {
                file_name = Some(name.to_string());
            }

            let bytes = field.bytes().await.map_err(|e| {
                TextLensError::InvalidRequest(format!("Failed to read file: {e}"))
            })?;

            if bytes.len() > state.config.upload.max_file_size {
                return Err(TextLensError::InvalidRequest(format!(
                    "File too large: {} bytes (max {} bytes)",
                    bytes.len(),
                    state.config.upload.max_file_size
                )));
            }

            file_bytes = Some(bytes.to_vec());
        }
    }

    let bytes = match file_bytes {
        Some(b) => b,
        None => {
            error!("no file part in upload request");
            return Err(TextLensError::InvalidRequest("No file part".to_string()));
        }
    };

    let claimed = file_name.unwrap_or_default();
    if claimed.is_empty() {
        error!("no file selected for upload");
        return Err(TextLensError::InvalidRequest("No selected file".to_string()));
    }

    let allowed = claimed_extension(&claimed)
        .map(|ext| state.config.upload.is_allowed_extension(&ext))
        .unwrap_or(false);
    if !allowed {
        error!(file = %claimed, "file type not allowed");
        return Err(TextLensError::InvalidRequest(
            "File type not allowed".to_string(),
        ));
    }

    let stored = state.storage.store_upload(&claimed, &bytes).await?;

    let normalized = run_normalize(&state.normalize_pool, stored).await?;

    let reference = normalized
        .asset()
        .file_name()
        .ok_or_else(|| TextLensError::Internal("normalized asset has no file name".to_string()))?
        .to_string();

    let extracted_text = state.recognition.recognize(&reference).await?;

    info!(file = %reference, "upload processed");
    Ok(Json(UploadResponse {
        message: "File uploaded and processed".to_string(),
        data: RecognitionResponse { extracted_text },
    }))
}
