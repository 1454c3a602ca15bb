//! Authoritative set of active log subscriptions.
//!
//! [`SubscriptionRegistry`] is the only shared mutable state in the logs
//! channel. It is mutated from connection tasks (subscribe, unsubscribe,
//! lifecycle cleanup) and read from the fan-out task, so it lives behind a
//! [`tokio::sync::RwLock`].

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::client::ClientHandle;
use crate::domain::ClientId;

/// Set of connections currently receiving the live log feed.
///
/// Keyed by [`ClientId`], so at most one subscription exists per distinct
/// connection. Membership is only removed explicitly (unsubscribe, error
/// signal, close signal) — never expired.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: RwLock<HashMap<ClientId, ClientHandle>>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a subscription for the given connection.
    ///
    /// Set semantics: if the connection is already subscribed this is a
    /// no-op, so a client that subscribes twice still receives each event
    /// exactly once. Always succeeds.
    pub async fn add(&self, client: ClientHandle) {
        let mut map = self.subscriptions.write().await;
        map.entry(client.id()).or_insert(client);
    }

    /// Removes the subscription for the given connection, if any.
    ///
    /// Removing a non-member is a no-op, so racing cleanup paths (explicit
    /// unsubscribe, error signal, close signal) are harmless.
    pub async fn remove(&self, id: ClientId) {
        let mut map = self.subscriptions.write().await;
        map.remove(&id);
    }

    /// Returns `true` if the connection is currently subscribed.
    pub async fn contains(&self, id: ClientId) -> bool {
        self.subscriptions.read().await.contains_key(&id)
    }

    /// Returns a cloned snapshot of all subscribed handles.
    ///
    /// Fan-out iterates the snapshot while adds and removes proceed
    /// concurrently; a connection mutated mid-dispatch may or may not
    /// receive that particular event (weak consistency, by contract).
    pub async fn snapshot(&self) -> Vec<ClientHandle> {
        self.subscriptions.read().await.values().cloned().collect()
    }

    /// Returns the number of active subscriptions.
    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Returns `true` if no connection is subscribed.
    pub async fn is_empty(&self) -> bool {
        self.subscriptions.read().await.is_empty()
    }
}
