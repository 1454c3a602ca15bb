//! # logstream-gateway
//!
//! WebSocket gateway streaming live system log events to authorized admin
//! clients.
//!
//! Clients connect over a persistent WebSocket and send `subscribe_logs` /
//! `unsubscribe_logs` control messages; events published on the internal
//! `"logs"` bus topic are fanned out to exactly the set of currently
//! subscribed connections, and subscriptions are torn down automatically
//! when a connection errors or closes.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS upgrade + connection loop (ws/)
//!     │       ├── dispatch gate (message type)
//!     │       └── lifecycle signals (error/close)
//!     │
//!     ├── LogsChannel (ws/logs.rs)
//!     │       ├── control-message router (authorize, mutate, reply)
//!     │       └── fan-out dispatcher (bus → subscribers)
//!     │
//!     ├── SubscriptionRegistry (ws/registry.rs)
//!     │
//!     └── LogBus (domain/) ←── BusForwardLayer (logging.rs)
//! ```

pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod ws;
