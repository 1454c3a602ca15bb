//! logstream-gateway server entry point.
//!
//! Starts the Axum server with the `/ws` endpoint and wires the gateway's
//! own tracing output into the log bus.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use logstream_gateway::app_state::AppState;
use logstream_gateway::config::GatewayConfig;
use logstream_gateway::domain::LogBus;
use logstream_gateway::logging::BusForwardLayer;
use logstream_gateway::ws::{self, LogsChannel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Arc::new(GatewayConfig::from_env()?);

    // Build the log bus and initialize tracing; the gateway's own log
    // events are what flows to subscribed clients.
    let log_bus = LogBus::new(config.log_bus_capacity);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(BusForwardLayer::new(log_bus.clone()))
        .init();

    tracing::info!(addr = %config.listen_addr, "starting logstream-gateway");
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN unset; no client can subscribe to the logs channel");
    }

    // Build the logs channel and its single long-lived bus subscription
    let logs = Arc::new(LogsChannel::new());
    logs.spawn_fanout(&log_bus);

    // Build application state
    let app_state = AppState {
        logs,
        config: Arc::clone(&config),
    };

    // Build router
    let app = ws::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
