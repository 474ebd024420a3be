use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::RecognitionClientConfig;
use crate::error::{Result, TextLensError};

/// Request body crossing the service boundary: a reference to an asset
/// already placed in shared storage, never raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionRequest {
    pub file_path: String,
}

/// Success payload coming back across the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResponse {
    pub extracted_text: String,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    error: String,
}

/// HTTP client for the recognition service. One attempt per call, bounded
/// by the configured timeout — a failed call is surfaced to the caller,
/// never silently retried.
#[derive(Clone)]
pub struct RecognitionClient {
    client: Client,
    base_url: String,
}

impl RecognitionClient {
    pub fn new(config: &RecognitionClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                TextLensError::Internal(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a normalized-asset reference for recognition and return the
    /// extracted text.
    pub async fn recognize(&self, file_name: &str) -> Result<String> {
        let url = format!("{}/ocr", self.base_url);
        let request = RecognitionRequest {
            file_path: file_name.to_string(),
        };

        debug!(file = %file_name, url = %url, "dispatching recognition request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(file = %file_name, error = %e, "recognition service unreachable");
                TextLensError::ServiceUnavailable(format!(
                    "Connection to recognition service failed: {e}"
                ))
            })?;

        let status = response.status();
        if status.is_success() {
            let payload: RecognitionResponse = response.json().await.map_err(|e| {
                TextLensError::RecognitionFailed {
                    status: None,
                    message: format!("malformed recognition response: {e}"),
                }
            })?;
            return Ok(payload.extracted_text);
        }

        let message = response
            .json::<RemoteError>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| "Text recognition processing failed".to_string());

        error!(file = %file_name, status = %status, message = %message, "recognition service rejected request");

        if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            return Err(TextLensError::UnsupportedFormat(message));
        }

        Err(TextLensError::RecognitionFailed {
            status: Some(status.as_u16()),
            message,
        })
    }
}
