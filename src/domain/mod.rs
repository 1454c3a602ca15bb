//! Domain layer: connection identity, log events, and the log bus.
//!
//! This module contains the transport-independent model: the identity type
//! used to key subscriptions, the opaque log-event payload, and the
//! broadcast bus that carries events from producers to the logs channel.

pub mod client_id;
pub mod log_bus;
pub mod log_event;

pub use client_id::ClientId;
pub use log_bus::LogBus;
pub use log_event::LogEvent;
