//! Logs-channel wire shapes: control messages, frames, and the type gate.

use serde::{Deserialize, Serialize};

use crate::domain::LogEvent;
use crate::error::{ErrorBody, GatewayError};

/// Channel name carried on every outbound frame.
pub const LOGS_CHANNEL: &str = "logs";

/// Control messages a client can send on the logs channel.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogsControlMessage {
    /// Start receiving the live log feed.
    SubscribeLogs,
    /// Stop receiving the live log feed.
    UnsubscribeLogs,
}

impl LogsControlMessage {
    /// Returns the wire-level event name for this message.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::SubscribeLogs => "subscribe_logs",
            Self::UnsubscribeLogs => "unsubscribe_logs",
        }
    }
}

/// Returns `true` if `message_type` belongs to the logs channel.
///
/// The dispatch gate checks this before any schema parsing, so the channel
/// never pays parsing cost or emits errors for other channels' traffic.
#[must_use]
pub fn is_logs_message(message_type: &str) -> bool {
    matches!(message_type, "subscribe_logs" | "unsubscribe_logs")
}

/// Cheap probe for the `"type"` tag of a raw inbound message.
///
/// Returns `None` when the text is not a JSON object with a string `type`.
#[must_use]
pub fn message_type(raw: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct TypeProbe {
        #[serde(rename = "type")]
        message_type: String,
    }

    serde_json::from_str::<TypeProbe>(raw)
        .ok()
        .map(|probe| probe.message_type)
}

/// Acknowledgement frame for a completed subscribe/unsubscribe request.
#[derive(Debug, Serialize)]
pub struct AckFrame {
    /// Always [`LOGS_CHANNEL`].
    pub channel: &'static str,
    /// Event name of the acknowledged request.
    pub event: &'static str,
}

/// Builds the acknowledgement frame for a control message.
#[must_use]
pub const fn fmt_ack(message: LogsControlMessage) -> AckFrame {
    AckFrame {
        channel: LOGS_CHANNEL,
        event: message.event_name(),
    }
}

/// Fan-out frame wrapping one log event.
#[derive(Debug, Serialize)]
pub struct DataFrame<'a> {
    /// Always [`LOGS_CHANNEL`].
    pub channel: &'static str,
    /// The opaque log-event payload, forwarded verbatim.
    pub data: &'a LogEvent,
}

/// Builds the fan-out frame for a log event.
#[must_use]
pub const fn fmt_data(event: &LogEvent) -> DataFrame<'_> {
    DataFrame {
        channel: LOGS_CHANNEL,
        data: event,
    }
}

/// Error frame reported back on the connection that caused the failure.
#[derive(Debug, Serialize)]
pub struct ErrorFrame {
    /// Always [`LOGS_CHANNEL`].
    pub channel: &'static str,
    /// Scope of the failure: `"error"` for channel-level failures
    /// (authorization, malformed request), or the event name of the
    /// specific operation that failed.
    pub event: &'static str,
    /// Structured error body.
    pub error: ErrorBody,
}

/// Builds an error frame scoped to `event`.
#[must_use]
pub fn fmt_error(event: &'static str, err: &GatewayError) -> ErrorFrame {
    ErrorFrame {
        channel: LOGS_CHANNEL,
        event,
        error: err.to_body(),
    }
}
