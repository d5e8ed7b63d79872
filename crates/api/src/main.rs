use anyhow::Result;
use clap::Parser;
use place_api::config::Config;
use place_canvas::Canvas;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(version, about = "Serves the place canvas over HTTP")]
struct Args {
    /// YAML configuration file; missing files fall back to defaults
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "place_api=debug,place_canvas=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    info!("Loaded configuration from {}", args.config.display());
    info!("Backing store: {}", config.storage.backing_store);

    let canvas = Arc::new(Canvas::with_kind(config.storage.backing_store));
    let app = place_api::app(canvas, &config);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        "Listening on {} under {}",
        listener.local_addr()?,
        config.server.api_prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
