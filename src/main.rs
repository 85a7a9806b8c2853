//! chainhub daemon entry point.
//!
//! Builds the pool at the composition root, sets up a connection per
//! configured chain, and serves the status API until shutdown.

use std::sync::Arc;

use anyhow::anyhow;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chainhub::api;
use chainhub::app_state::AppState;
use chainhub::config::{self, HubConfig};
use chainhub::lifecycle::{LifecycleBus, LifecycleEvent, spawn_lifecycle_driver};
use chainhub::pool::{ConnectionPool, ConnectionStateSubscriber, StateLogger};
use chainhub::transport::WsConnectionFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let hub_config =
        HubConfig::from_env().map_err(|error| anyhow!("loading configuration: {error}"))?;
    tracing::info!(addr = %hub_config.listen_addr, "starting chainhub");

    let chains = config::load_chains(&hub_config.chains_file).map_err(|error| {
        anyhow!(
            "loading chains from {}: {error}",
            hub_config.chains_file.display()
        )
    })?;

    // Build the pool at the composition root; every consumer shares this
    // one instance by handle.
    let factory = Arc::new(WsConnectionFactory::new(hub_config.transport_tuning()));
    let pool = ConnectionPool::new(factory);

    let state_logger: Arc<dyn ConnectionStateSubscriber> = Arc::new(StateLogger);
    for chain in &chains {
        pool.subscribe(&state_logger, &chain.chain_id);
        if let Err(error) = pool.setup_connection(chain) {
            tracing::error!(chain = %chain.chain_id, %error, "skipping misconfigured chain");
        }
    }

    // Lifecycle plumbing
    let lifecycle = LifecycleBus::new(hub_config.lifecycle_bus_capacity);
    let _driver = spawn_lifecycle_driver(pool.clone(), lifecycle.subscribe());

    // Build application state and router
    let app_state = AppState { pool };
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(hub_config.listen_addr).await?;
    tracing::info!(addr = %hub_config.listen_addr, chains = chains.len(), "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(lifecycle))
        .await?;

    Ok(())
}

/// Resolves on ctrl-c, suspending every chain before the server stops
/// accepting connections.
async fn shutdown_signal(lifecycle: LifecycleBus) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received, suspending chains");
    lifecycle.publish(LifecycleEvent::Suspended);
}
