//! OTLP JSON encoding of finished spans.
//!
//! Each exported batch becomes one JSON document on one line, shaped like an
//! OTLP/HTTP JSON request body so standard collectors and viewers can read it.

use opentelemetry::trace::{Event, Link, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::{json, Value as JsonValue};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct SpanFormatter {
    resource: Resource,
    scope: &'static str,
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .to_string()
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        // OTLP JSON carries 64-bit integers as strings.
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.as_str() }),
        Value::Array(_) => json!({ "stringValue": value.to_string() }),
    }
}

fn attributes(values: &[KeyValue]) -> Vec<JsonValue> {
    values
        .iter()
        .map(|kv| json!({ "key": kv.key.as_str(), "value": attribute_value(&kv.value) }))
        .collect()
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!({ "code": 0 }),
        Status::Ok => json!({ "code": 1 }),
        Status::Error { description } => json!({ "code": 2, "message": description }),
    }
}

fn event(event: &Event) -> JsonValue {
    json!({
        "timeUnixNano": unix_nanos(event.timestamp),
        "name": event.name,
        "attributes": attributes(&event.attributes),
    })
}

fn link(link: &Link) -> JsonValue {
    json!({
        "traceId": format!("{:032x}", link.span_context.trace_id()),
        "spanId": format!("{:016x}", link.span_context.span_id()),
        "attributes": attributes(&link.attributes),
    })
}

impl SpanFormatter {
    #[must_use]
    pub const fn new(resource: Resource, scope: &'static str) -> Self {
        Self { resource, scope }
    }

    /// One OTLP document holding every span of the batch.
    #[must_use]
    pub fn format_batch(&self, batch: &[SpanData]) -> JsonValue {
        let resource: Vec<JsonValue> = self
            .resource
            .iter()
            .map(|(key, value)| json!({ "key": key.as_str(), "value": attribute_value(value) }))
            .collect();

        json!({
            "resourceSpans": [{
                "resource": { "attributes": resource },
                "scopeSpans": [{
                    "scope": { "name": self.scope },
                    "spans": batch.iter().map(Self::format_span).collect::<Vec<_>>(),
                }],
            }],
        })
    }

    fn format_span(span: &SpanData) -> JsonValue {
        let parent = if span.parent_span_id == opentelemetry::trace::SpanId::INVALID {
            String::new()
        } else {
            format!("{:016x}", span.parent_span_id)
        };

        json!({
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "name": span.name,
            "kind": kind_code(&span.span_kind),
            "startTimeUnixNano": unix_nanos(span.start_time),
            "endTimeUnixNano": unix_nanos(span.end_time),
            "attributes": attributes(&span.attributes),
            "events": span.events.iter().map(event).collect::<Vec<_>>(),
            "links": span.links.iter().map(link).collect::<Vec<_>>(),
            "status": status(&span.status),
        })
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_encoded_as_strings() {
        assert_eq!(attribute_value(&Value::I64(42)), json!({ "intValue": "42" }));
        assert_eq!(attribute_value(&Value::Bool(true)), json!({ "boolValue": true }));
    }

    #[test]
    fn empty_batch_carries_resource_and_scope() {
        let formatter = SpanFormatter::new(
            Resource::new(vec![KeyValue::new("service.name", "blogline")]),
            "blogline",
        );
        let doc = formatter.format_batch(&[]);
        let resource_span = &doc["resourceSpans"][0];
        assert_eq!(resource_span["resource"]["attributes"][0]["key"], "service.name");
        assert_eq!(resource_span["scopeSpans"][0]["scope"]["name"], "blogline");
        assert_eq!(resource_span["scopeSpans"][0]["spans"], json!([]));
    }
}
