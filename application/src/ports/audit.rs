//! Port for durable audit logging.
//!
//! Defines the [`AuditSink`] trait for recording verification events
//! (consensus decisions, escalations, explicit proceed-anyway consent,
//! retry exhaustion) to durable storage.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the audit
//! trail keyed by consensus `audit_id` in a machine-readable format.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A structured audit event.
pub struct AuditEvent {
    /// Event type identifier (e.g. "consensus", "escalation",
    /// "proceed_anyway", "max_attempts_exceeded").
    pub event_type: &'static str,
    /// UTC timestamp taken at construction.
    pub recorded_at: DateTime<Utc>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    /// Create a new audit event with the current UTC timestamp.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            recorded_at: Utc::now(),
            payload,
        }
    }
}

/// Port for recording audit events.
///
/// The `record` method is intentionally synchronous and non-fallible to
/// avoid disrupting the verification flow - storage failures are the
/// adapter's problem, never the orchestrator's.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is wired elsewhere.
pub struct NoAuditSink;

impl AuditSink for NoAuditSink {
    fn record(&self, _event: AuditEvent) {}
}
