//! Provides the [`TracingHandler`], which forwards records to the `tracing` ecosystem.

use serde_json::{Map, Value as JsonValue};

use super::{Handler, Record};
use crate::{Level, LoggerError};

/// Target of the events emitted by [`TracingHandler`].
const TARGET: &str = "ylog";

/// A [`Handler`] which re-emits records as [`tracing`] events, so that they reach whatever
/// subscriber the application has installed.
///
/// Each event carries the resolved message and the fields `ylog.level` (the original level,
/// since `tracing` has no levels above `ERROR`), `caller`, `trace_id` and `fields` (the record
/// and context fields, encoded as a JSON object).
#[derive(Clone, Copy, Debug)]
pub struct TracingHandler {
    level: Level,
}

impl TracingHandler {
    /// Creates a handler forwarding records at or above `level`.
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn fields(record: &Record<'_>) -> String {
        let mut fields = Map::new();
        for (key, value) in record.context().fields().iter().chain(record.fields()) {
            if let Ok(value) = serde_json::to_value(value) {
                fields.insert((*key).to_string(), value);
            }
        }
        JsonValue::Object(fields).to_string()
    }
}

impl Handler for TracingHandler {
    fn name(&self) -> &str {
        "tracing"
    }

    fn log(&self, record: &Record<'_>) {
        if record.level() < self.level {
            return;
        }

        let message = record.message();
        let level = record.level().as_str();
        let caller = record.call_site();
        let trace_id = record.context().trace_id().unwrap_or_default();
        let fields = Self::fields(record);

        macro_rules! forward {
            ($tracing_level:expr) => {
                tracing::event!(
                    target: TARGET,
                    $tracing_level,
                    ylog.level = level,
                    caller = %caller,
                    trace_id,
                    fields = %fields,
                    "{message}"
                )
            };
        }

        match record.level() {
            Level::Debug => forward!(tracing::Level::DEBUG),
            Level::Info => forward!(tracing::Level::INFO),
            Level::Warn => forward!(tracing::Level::WARN),
            Level::Error | Level::Panic | Level::Fatal => forward!(tracing::Level::ERROR),
        }
    }

    fn close(&self) -> Result<(), LoggerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallSite, Context, Value, test_utils::SharedBuffer};

    fn forwarded(handler: TracingHandler, record: &Record<'_>) -> Vec<JsonValue> {
        let buffer = SharedBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(buffer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || handler.log(record));

        buffer.records()
    }

    #[test]
    fn forwards_message_and_fields() {
        let ctx = Context::background()
            .with_trace_id("trace_xxxx")
            .with_field("tenant", "acme");
        let args = [Value::from("world")];
        let fields = [("attempt", Value::from(2))];
        let call_site = CallSite::new("src/a.rs", 3, "a");
        let record =
            Record::new(Level::Fatal, &ctx, call_site, "hello %s", &args).with_fields(&fields);

        let events = forwarded(TracingHandler::new(Level::Info), &record);

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["target"], "ylog");
        assert_eq!(event["fields"]["message"], "hello world");
        assert_eq!(event["fields"]["ylog.level"], "fatal");
        assert_eq!(event["fields"]["caller"], "a.rs:3(a)");
        assert_eq!(event["fields"]["trace_id"], "trace_xxxx");

        let extra: JsonValue =
            serde_json::from_str(event["fields"]["fields"].as_str().unwrap()).unwrap();
        assert_eq!(extra, serde_json::json!({ "tenant": "acme", "attempt": 2 }));
    }

    #[test]
    fn records_below_threshold_are_not_forwarded() {
        let ctx = Context::background();
        let record = Record::new(Level::Debug, &ctx, CallSite::caller(), "quiet", &[]);

        let events = forwarded(TracingHandler::new(Level::Info), &record);

        assert!(events.is_empty());
    }
}
