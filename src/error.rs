//! Gateway error types with wire-level error code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a string error code carried inside a structured error frame on
//! the WebSocket (see [`crate::ws::messages`]).

use serde::Serialize;

/// Inner error body carried in an error frame.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable string error code (see [`GatewayError::error_code`]).
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum for the logs channel.
///
/// All externally-visible failures become reply frames on the connection
/// that caused them; none of these variants is allowed to terminate a
/// connection task or the process.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Caller lacks administrative privilege for the named channel.
    #[error("you don't have permission to access the \"{channel}\" channel")]
    Forbidden {
        /// Channel the caller attempted to access.
        channel: &'static str,
    },

    /// Inbound message failed schema validation.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A send hit a connection whose outbox is already closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Unexpected internal failure during request processing.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the stable string error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::ConnectionClosed => "CONNECTION_CLOSED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Builds the serializable error body for an error frame.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_names_the_channel() {
        let err = GatewayError::Forbidden { channel: "logs" };
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(err.to_string().contains("\"logs\""));
    }

    #[test]
    fn body_serializes_code_and_message() {
        let err = GatewayError::MalformedRequest("bad frame".to_string());
        let json = serde_json::to_value(err.to_body()).unwrap_or_default();
        assert_eq!(json["code"], "MALFORMED_REQUEST");
        assert!(
            json["message"]
                .as_str()
                .is_some_and(|m| m.contains("bad frame"))
        );
    }
}
