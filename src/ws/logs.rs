//! The logs subscription channel: control-message routing and fan-out.
//!
//! [`LogsChannel`] owns the [`SubscriptionRegistry`] and is driven by three
//! independent sources: control messages from connection tasks, log events
//! from the single long-lived bus subscription, and lifecycle cleanup calls
//! when a connection errors or closes. All three paths converge only on the
//! registry, which is the channel's sole shared state.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::client::ClientHandle;
use super::messages::{self, LOGS_CHANNEL, LogsControlMessage};
use super::registry::SubscriptionRegistry;
use crate::domain::{ClientId, LogBus};
use crate::error::GatewayError;

/// Real-time log-streaming channel for administrator clients.
#[derive(Debug, Default)]
pub struct LogsChannel {
    registry: Arc<SubscriptionRegistry>,
}

impl LogsChannel {
    /// Creates a channel with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the channel's subscription registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Spawns the fan-out task draining one bus subscription.
    ///
    /// Called once at construction time; the task lives for the process.
    /// For every event received, the current registry snapshot is walked
    /// and a data frame is sent to each subscriber. Per-recipient failures
    /// are isolated: a dead connection never blocks delivery to the rest,
    /// and its cleanup belongs to the lifecycle signals, not to fan-out.
    pub fn spawn_fanout(&self, bus: &LogBus) -> JoinHandle<()> {
        let mut events = bus.subscribe();
        let registry = Arc::clone(&self.registry);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        for client in registry.snapshot().await {
                            if client.send_json(&messages::fmt_data(&event)).is_err() {
                                tracing::trace!(
                                    client = %client.id(),
                                    "log delivery to closed connection skipped"
                                );
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(dropped = n, "logs fan-out lagged behind the bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Handles one gated inbound control message.
    ///
    /// The dispatch gate has already matched the `"type"` tag against the
    /// logs channel, so `raw` is expected to be one of the two control
    /// messages. Every failure path replies with an error frame on the
    /// same connection; nothing propagates out of this call.
    pub async fn handle_raw(&self, client: &ClientHandle, raw: &str) {
        let message: LogsControlMessage = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(err) => {
                let err = GatewayError::MalformedRequest(err.to_string());
                self.send_error(client, "error", &err);
                return;
            }
        };
        self.handle(client, message).await;
    }

    /// Handles one parsed control message: authorize, mutate, reply.
    pub async fn handle(&self, client: &ClientHandle, message: LogsControlMessage) {
        // Re-read the accountability on every request; already-active
        // subscriptions are not re-checked.
        if !client.is_admin() {
            let err = GatewayError::Forbidden {
                channel: LOGS_CHANNEL,
            };
            self.send_error(client, "error", &err);
            return;
        }

        let result = match message {
            LogsControlMessage::SubscribeLogs => self.subscribe(client).await,
            LogsControlMessage::UnsubscribeLogs => self.unsubscribe(client).await,
        };

        // The client always gets a terminal response for the request it
        // made, scoped to that request's event name.
        if let Err(err) = result {
            self.send_error(client, message.event_name(), &err);
        }
    }

    /// Lifecycle cleanup: drops the connection's subscription, if any.
    ///
    /// Invoked when the transport signals an error or a close for the
    /// connection. Idempotent, so both signals racing is harmless.
    pub async fn disconnect(&self, id: ClientId) {
        self.registry.remove(id).await;
    }

    async fn subscribe(&self, client: &ClientHandle) -> Result<(), GatewayError> {
        self.registry.add(client.clone()).await;
        client.send_json(&messages::fmt_ack(LogsControlMessage::SubscribeLogs))
    }

    async fn unsubscribe(&self, client: &ClientHandle) -> Result<(), GatewayError> {
        self.registry.remove(client.id()).await;
        client.send_json(&messages::fmt_ack(LogsControlMessage::UnsubscribeLogs))
    }

    fn send_error(&self, client: &ClientHandle, event: &'static str, err: &GatewayError) {
        if client.send_json(&messages::fmt_error(event, err)).is_err() {
            tracing::debug!(client = %client.id(), error = %err, "error reply undeliverable");
        }
    }
}
