//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::ws::LogsChannel;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Constructed once in `main` and passed down; nothing in the gateway
/// looks these handles up ambiently.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The logs subscription channel.
    pub logs: Arc<LogsChannel>,
    /// Gateway configuration (admin token for accountability resolution).
    pub config: Arc<GatewayConfig>,
}
