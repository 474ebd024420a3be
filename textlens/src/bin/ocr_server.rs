use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textlens::api::{recognition_router, shutdown_signal, RecognitionState};
use textlens::config::Config;
use textlens::ocr::OcrProvider;

#[derive(Parser)]
#[command(name = "textlens-ocr")]
#[command(about = "Recognition service: extracts text from normalized images")]
struct Args {
    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textlens=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.recognition.port = port;
    }

    tracing::info!(languages = %config.ocr.languages, "Initializing OCR engine...");
    let ocr = OcrProvider::new(&config.ocr)?;
    if !ocr.is_available() {
        tracing::warn!("OCR engine unavailable - recognition requests will be rejected");
    }

    let state = RecognitionState::new(config.clone(), ocr)?;
    let app = recognition_router(state);

    let addr = format!("{}:{}", config.recognition.host, config.recognition.port);
    tracing::info!("textlens recognition service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
