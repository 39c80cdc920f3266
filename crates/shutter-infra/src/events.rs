//! Event sink that writes categorized events through `tracing`.
//!
//! Each category logs under its own target (`business`, `security`,
//! `performance`, `audit`) so the subscriber's filter can route them.

use serde_json::Value;
use shutter_core::ports::{EventCategory, EventSink};

const MASK: &str = "***MASKED***";

const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "session",
    "cookie",
    "authorization",
    "api_key",
];

/// Writes events as structured tracing records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn record(&self, category: EventCategory, event: &str, fields: Value) {
        let fields = mask_sensitive(fields).to_string();

        match category {
            EventCategory::Business => {
                tracing::info!(target: "business", event_type = event, fields = %fields, "business event")
            }
            EventCategory::Security => {
                tracing::warn!(target: "security", event_type = event, fields = %fields, "security event")
            }
            EventCategory::Performance => {
                tracing::info!(target: "performance", event_type = event, fields = %fields, "performance event")
            }
            EventCategory::Audit => {
                tracing::info!(target: "audit", event_type = event, fields = %fields, "audit event")
            }
        }
    }
}

fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|s| key.contains(s))
}

/// Replace the values of sensitive keys, at any depth.
pub fn mask_sensitive(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    if is_sensitive(&k) {
                        (k, Value::String(MASK.to_string()))
                    } else {
                        (k, mask_sensitive(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(mask_sensitive).collect()),
        other => other,
    }
}
