use crate::record::{Level, LogRecord};
use crate::registry::Registry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that observes events and hands them to a
/// [`Registry`] as normalized [`LogRecord`]s.
///
/// Dispatch is fully synchronous: the record is built and delivered to the
/// matching logger's sinks inline, on the thread the event was emitted from.
/// A slow sink therefore blocks the emitting log call for its full duration,
/// and sink failures are reported on standard error by the dispatcher rather
/// than surfaced to the caller.
pub struct RegistryLayer {
    registry: Arc<Registry>,
}

impl RegistryLayer {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

impl<S> Layer<S> for RegistryLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let mut record = LogRecord::new(Level::from(*meta.level()), meta.target());
        record.logger = Some(meta.target().to_string());
        record.module = meta.module_path().map(|s| s.to_string());
        record.file = meta.file().map(|s| s.to_string());
        record.line = meta.line();
        record.message = message;
        record.fields = fields;

        self.registry.dispatch(&record);
    }
}

/// Collects an event's `message` and remaining key-value fields.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }
}
