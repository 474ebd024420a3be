//! HTTP surface for both services.
//!
//! `ingress` serves `POST /upload` (multipart) and relays normalized
//! assets to the recognition service; `recognition` serves `POST /ocr`
//! (JSON file reference) and runs the engine. Each router carries its own
//! state; the normalizer runs on a bounded blocking pool shared through
//! that state.

mod ingress;
mod recognition;
mod state;

pub use ingress::{ingress_router, UploadResponse};
pub use recognition::recognition_router;
pub use state::{IngressState, RecognitionState};

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::{Result, TextLensError};
use crate::normalize::{self, Normalized};

/// Run the blocking normalizer off the request loop, gated by the bounded
/// worker pool. Requests beyond the pool size queue on the semaphore.
pub(crate) async fn run_normalize(pool: &Arc<Semaphore>, path: PathBuf) -> Result<Normalized> {
    let permit = pool
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| TextLensError::Internal("normalizer pool closed".to_string()))?;

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        normalize::normalize(&path)
    })
    .await
    .map_err(|e| TextLensError::Internal(format!("normalization task panicked: {e}")))?
}

/// Resolves when SIGINT or SIGTERM arrives; used by both binaries for
/// graceful shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
