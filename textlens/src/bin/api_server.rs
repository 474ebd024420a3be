use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textlens::api::{ingress_router, shutdown_signal, IngressState};
use textlens::config::Config;

#[derive(Parser)]
#[command(name = "textlens-api")]
#[command(about = "Ingress API: accepts image uploads and relays them for text recognition")]
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
        config.ingress.port = port;
    }

    tracing::info!(
        upload_dir = %config.storage.upload_dir.display(),
        recognition_url = %config.recognition_client.base_url,
        "Initializing ingress service..."
    );
    let state = IngressState::new(config.clone())?;
    let app = ingress_router(state);

    let addr = format!("{}:{}", config.ingress.host, config.ingress.port);
    tracing::info!("textlens ingress starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
