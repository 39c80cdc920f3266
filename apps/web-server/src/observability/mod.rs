//! Observability module - correlation ids for request tracing.

mod correlation_id;

pub use correlation_id::{CORRELATION_ID_HEADER, CorrelationId, CorrelationIdMiddleware};
