//! Tracing layer that forwards the gateway's own log events onto the bus.
//!
//! [`BusForwardLayer`] sits in the `tracing-subscriber` stack next to the
//! fmt layer. Every tracing event is serialized to a JSON object (fields,
//! level, target, timestamp) and published as a [`LogEvent`] on the
//! [`LogBus`], which is what subscribed admin clients ultimately receive.
//!
//! Events emitted from the ws layer itself are skipped; forwarding them
//! would generate new bus events on every delivery failure and loop.

use serde_json::{Map, Value, json};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::domain::{LogBus, LogEvent};

/// Target prefix whose events are never forwarded to the bus.
const WS_TARGET_PREFIX: &str = "logstream_gateway::ws";

/// Forwards tracing events to a [`LogBus`] as JSON payloads.
#[derive(Debug)]
pub struct BusForwardLayer {
    bus: LogBus,
}

impl BusForwardLayer {
    /// Creates a layer publishing to the given bus.
    #[must_use]
    pub const fn new(bus: LogBus) -> Self {
        Self { bus }
    }
}

impl<S: Subscriber> Layer<S> for BusForwardLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with(WS_TARGET_PREFIX) {
            return;
        }

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut fields = visitor.fields;
        fields.insert("level".to_string(), json!(meta.level().to_string()));
        fields.insert("target".to_string(), json!(meta.target()));
        fields.insert(
            "timestamp".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        self.bus.publish(LogEvent::new(Value::Object(fields)));
    }
}

/// Collects a tracing event's fields into a JSON map.
#[derive(Default)]
struct JsonVisitor {
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        // tracing calls the free-text field "message"; keep that name.
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, json!(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, json!(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, json!(format!("{value:?}")));
    }
}
