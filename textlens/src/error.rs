use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextLensError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Metadata strip failed: {0}")]
    MetadataStrip(String),

    #[error("Recognition service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Text recognition failed: {message}")]
    RecognitionFailed {
        /// Upstream HTTP status, when the failure came back over the wire.
        /// `None` for local engine failures.
        status: Option<u16>,
        message: String,
    },

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl TextLensError {
    /// Shorthand for a local (non-HTTP) recognition failure.
    pub fn recognition<S: Into<String>>(message: S) -> Self {
        Self::RecognitionFailed {
            status: None,
            message: message.into(),
        }
    }
}

impl IntoResponse for TextLensError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TextLensError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            TextLensError::UnsupportedFormat(msg) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.clone())
            }
            TextLensError::MetadataStrip(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            TextLensError::ServiceUnavailable(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            TextLensError::RecognitionFailed { status, message } => {
                // Propagate the upstream error status where it is meaningful,
                // otherwise collapse to a generic server error.
                let propagated = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (propagated, message.clone())
            }
            TextLensError::OcrUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            TextLensError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            TextLensError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, TextLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_400() {
        let resp = TextLensError::InvalidRequest("No file part".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_format_maps_to_415() {
        let resp = TextLensError::UnsupportedFormat("not an image".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_service_unavailable_maps_to_500() {
        let resp =
            TextLensError::ServiceUnavailable("connection refused".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_recognition_failed_propagates_upstream_status() {
        let resp = TextLensError::RecognitionFailed {
            status: Some(415),
            message: "unsupported".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_recognition_failed_collapses_non_error_status() {
        // A nonsensical upstream status must not leak through as a success.
        let resp = TextLensError::RecognitionFailed {
            status: Some(204),
            message: "weird".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_local_recognition_failure_maps_to_500() {
        let resp = TextLensError::recognition("engine exploded").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ocr_unavailable_maps_to_503() {
        let resp = TextLensError::OcrUnavailable("tesseract missing".into()).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
