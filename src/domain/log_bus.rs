//! Broadcast channel for the `"logs"` topic.
//!
//! [`LogBus`] wraps a [`tokio::sync::broadcast`] channel. Log producers
//! publish [`LogEvent`]s through the bus, and the logs channel holds a
//! single long-lived subscription that fans events out to clients.

use tokio::sync::broadcast;

use super::LogEvent;

/// Broadcast bus for [`LogEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// Delivery is FIFO per publisher; when the ring buffer is full, the oldest
/// events are dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct LogBus {
    sender: broadcast::Sender<LogEvent>,
}

impl LogBus {
    /// Creates a new `LogBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: LogEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
