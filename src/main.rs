//! Process bootstrap: wire the store, broadcaster, simulator, and HTTP edge.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use tracker::config::HttpConfig;
use tracker::http::{self, AppState};
use tracker::store::MemoryStore;
use tracking::broadcast::LocationBroadcast;
use tracking::config::SimulatorConfig;
use tracking::simulator::MovementSimulator;

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let simulator_config = SimulatorConfig::from_env();
    let http_config = HttpConfig::from_env();

    let store = MemoryStore::new();
    store.seed_if_empty();

    // The broadcaster is owned here and injected everywhere it is needed;
    // there is no global handle.
    let broadcast = LocationBroadcast::new();

    let simulator = MovementSimulator::new(
        simulator_config.clone(),
        store.clone(),
        broadcast.clone(),
    );
    tokio::spawn(async move { simulator.run().await });

    let state = AppState::new(store, broadcast, simulator_config.active_window);
    let app = http::router(state, &http_config);

    let listener =
        TcpListener::bind(http_config.bind).await.context("binding HTTP listener")?;
    info!(addr = %http_config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}
