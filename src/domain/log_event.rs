//! Opaque log-event payload.

use serde::{Deserialize, Serialize};

/// One log event as published on the `"logs"` topic.
///
/// The gateway treats the payload as an uninterpreted blob: whatever the
/// producer publishes is wrapped in a data frame and forwarded verbatim to
/// every subscribed client. No schema is imposed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEvent(serde_json::Value);

impl LogEvent {
    /// Wraps a JSON value as a log event.
    #[must_use]
    pub const fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    /// Returns the inner JSON payload.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for LogEvent {
    fn from(payload: serde_json::Value) -> Self {
        Self(payload)
    }
}
