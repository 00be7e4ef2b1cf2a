use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tickscope::api;
use tickscope::config::Config;
use tickscope::processor::TickProcessor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    info!(dataset = %config.dataset.path.display(), "initializing data processing");

    // Initialization must complete before the server binds: a fatal dataset
    // problem exits here and nothing is ever served.
    let processor = TickProcessor::from_csv(&config.dataset.path).with_context(|| {
        format!(
            "failed to initialize dataset {}",
            config.dataset.path.display()
        )
    })?;
    info!(ticks = processor.tick_count(), "data processing complete");

    let addr = config.server.socket_addr()?;
    let app = api::router(Arc::new(processor));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "serving query API");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
