//! Per-connection read/write loop and lifecycle binding.
//!
//! One task per connection selects over the socket's inbound frames and
//! the connection's outbox. Inbound text frames pass the dispatch gate and
//! are routed to the logs channel; any transport error or close breaks the
//! loop, and the loop exit is the lifecycle signal that unconditionally
//! drops the connection's subscription.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::client::ClientHandle;
use super::logs::LogsChannel;
use super::messages;
use crate::auth::Accountability;
use crate::error::GatewayError;

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(
    socket: WebSocket,
    logs: Arc<LogsChannel>,
    accountability: Option<Accountability>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel();
    let client = ClientHandle::new(accountability, outbox_tx);
    tracing::debug!(client = %client.id(), admin = client.is_admin(), "ws connection established");

    loop {
        tokio::select! {
            // Queued outbound frame (ack, error, or fan-out data)
            frame = outbox_rx.recv() => {
                match frame {
                    Some(message) => {
                        if ws_tx.send(message).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            // Inbound frame from the client
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => dispatch(&client, &logs, text.as_str()).await,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(client = %client.id(), error = %err, "ws connection errored");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // Sole cleanup path for both error and close: registry removal.
    logs.disconnect(client.id()).await;
    tracing::debug!(client = %client.id(), "ws connection closed");
}

/// Dispatch gate: routes a raw text frame by its `"type"` tag.
///
/// Traffic whose tag belongs to another channel is discarded here without
/// any parsing beyond the tag probe; text that carries no readable tag is
/// answered with a generic malformed-request frame.
async fn dispatch(client: &ClientHandle, logs: &LogsChannel, raw: &str) {
    match messages::message_type(raw) {
        Some(message_type) if messages::is_logs_message(&message_type) => {
            logs.handle_raw(client, raw).await;
        }
        Some(_) => {}
        None => {
            let err = GatewayError::MalformedRequest("expected a typed JSON object".to_string());
            if client.send_json(&messages::fmt_error("error", &err)).is_err() {
                tracing::debug!(client = %client.id(), "malformed-request reply undeliverable");
            }
        }
    }
}
