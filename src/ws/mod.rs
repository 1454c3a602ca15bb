//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` provides bidirectional communication
//! for the real-time logs subscription channel.

pub mod client;
pub mod connection;
pub mod handler;
pub mod logs;
pub mod messages;
pub mod registry;

pub use client::ClientHandle;
pub use logs::LogsChannel;
pub use registry::SubscriptionRegistry;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// Builds the WebSocket router.
pub fn build_router() -> Router<AppState> {
    Router::new().route("/ws", get(handler::ws_handler))
}
