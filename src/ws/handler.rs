//! Axum WebSocket upgrade handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::auth;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Accountability is resolved once here, from the `access_token` query
/// parameter; connections without a valid admin token may still connect
/// but cannot subscribe to the logs channel.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let accountability = auth::resolve(
        params.get("access_token").map(String::as_str),
        state.config.admin_token.as_deref(),
    );
    let logs = Arc::clone(&state.logs);

    ws.on_upgrade(move |socket| run_connection(socket, logs, accountability))
}
