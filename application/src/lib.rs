//! Application layer for vigil
//!
//! This crate contains the self-auditing orchestrator, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, VerifierConfig};
pub use ports::{
    audit::{AuditEvent, AuditSink, NoAuditSink},
    generation::{GeneratedField, GenerationError, ResponseGenerator},
    progress::{NoVerificationProgress, VerificationProgress},
};
pub use use_cases::verify_response::{VerifyResponseError, VerifyResponseUseCase};
