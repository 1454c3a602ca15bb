//! Non-owning send handle for one WebSocket connection.

use axum::extract::ws::Message;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::auth::Accountability;
use crate::domain::ClientId;
use crate::error::GatewayError;

/// Cheap, cloneable handle to one live connection.
///
/// Holds the connection's identity, its accountability as resolved at the
/// handshake, and the sending half of the connection's outbox. The handle
/// does not keep the connection alive: when the connection task drops the
/// receiving half, every further send fails with
/// [`GatewayError::ConnectionClosed`] and registry cleanup (not handle
/// lifetime) governs teardown.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    accountability: Option<Accountability>,
    outbox: mpsc::UnboundedSender<Message>,
}

impl ClientHandle {
    /// Creates a handle with a fresh [`ClientId`].
    #[must_use]
    pub fn new(
        accountability: Option<Accountability>,
        outbox: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            id: ClientId::new(),
            accountability,
            outbox,
        }
    }

    /// Returns the connection's identity.
    #[must_use]
    pub const fn id(&self) -> ClientId {
        self.id
    }

    /// Returns the accountability resolved at the handshake, if any.
    #[must_use]
    pub const fn accountability(&self) -> Option<&Accountability> {
        self.accountability.as_ref()
    }

    /// Returns `true` if the connection holds administrative privilege.
    ///
    /// An absent accountability context is "not administrator".
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.accountability.as_ref().is_some_and(|acc| acc.admin)
    }

    /// Serializes `frame` and queues it on the connection's outbox.
    ///
    /// Fire-and-forget: the actual socket write happens in the connection
    /// task; socket failures surface there as lifecycle signals.
    ///
    /// # Errors
    ///
    /// [`GatewayError::ConnectionClosed`] if the connection task is gone,
    /// [`GatewayError::Internal`] if the frame fails to serialize.
    pub fn send_json<T: Serialize>(&self, frame: &T) -> Result<(), GatewayError> {
        let json =
            serde_json::to_string(frame).map_err(|err| GatewayError::Internal(err.to_string()))?;
        self.outbox
            .send(Message::text(json))
            .map_err(|_| GatewayError::ConnectionClosed)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handle(accountability: Option<Accountability>) -> (ClientHandle, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ClientHandle::new(accountability, tx), rx)
    }

    #[test]
    fn absent_accountability_is_not_admin() {
        let (client, _rx) = handle(None);
        assert!(!client.is_admin());
    }

    #[test]
    fn admin_flag_comes_from_accountability() {
        let (client, _rx) = handle(Some(Accountability {
            admin: true,
            user: None,
        }));
        assert!(client.is_admin());
    }

    #[tokio::test]
    async fn send_json_queues_a_text_frame() {
        let (client, mut rx) = handle(None);
        let result = client.send_json(&json!({"channel": "logs"}));
        assert!(result.is_ok());

        let Some(Message::Text(text)) = rx.recv().await else {
            panic!("expected a queued text frame");
        };
        assert!(text.as_str().contains("logs"));
    }

    #[test]
    fn send_to_dropped_outbox_fails_closed() {
        let (client, rx) = handle(None);
        drop(rx);
        let result = client.send_json(&json!({"channel": "logs"}));
        assert!(matches!(result, Err(GatewayError::ConnectionClosed)));
    }
}
