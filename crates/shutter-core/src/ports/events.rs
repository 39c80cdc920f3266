//! Event port - categorized structured events emitted by services.

use std::fmt;

/// Routing category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Product-level facts: a post was created, a user was followed.
    Business,
    /// Failed logins, ownership violations, stale sessions.
    Security,
    /// Timings of notable operations.
    Performance,
    /// Who changed what.
    Audit,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Business => "business",
            EventCategory::Security => "security",
            EventCategory::Performance => "performance",
            EventCategory::Audit => "audit",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for structured events.
///
/// `fields` is expected to be a JSON object of contextual values.
pub trait EventSink: Send + Sync {
    fn record(&self, category: EventCategory, event: &str, fields: serde_json::Value);

    fn business(&self, event: &str, fields: serde_json::Value) {
        self.record(EventCategory::Business, event, fields);
    }

    fn security(&self, event: &str, fields: serde_json::Value) {
        self.record(EventCategory::Security, event, fields);
    }

    fn performance(&self, event: &str, fields: serde_json::Value) {
        self.record(EventCategory::Performance, event, fields);
    }

    fn audit(&self, event: &str, fields: serde_json::Value) {
        self.record(EventCategory::Audit, event, fields);
    }
}

/// Sink that drops everything.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _category: EventCategory, _event: &str, _fields: serde_json::Value) {}
}
