//! Ports - interfaces to external collaborators.
//!
//! Adapters for these live outside this crate: the generation subsystem
//! produces candidate text, the audit sink durably records consensus
//! decisions, and progress notifiers surface verification lifecycle events.

pub mod audit;
pub mod generation;
pub mod progress;

pub use audit::{AuditEvent, AuditSink, NoAuditSink};
pub use generation::{GeneratedField, GenerationError, ResponseGenerator};
pub use progress::{NoVerificationProgress, VerificationProgress};
