//! Generation subsystem port
//!
//! Defines the interface to the collaborator that turns user input into a
//! candidate response string. How candidates are generated is out of scope
//! here; the orchestrator only needs the two-step field contract: weigh the
//! field, then derive text (or deliberate silence) from it.

use async_trait::async_trait;
use thiserror::Error;
use vigil_domain::{ConversationContext, FieldState};

/// Errors that can occur in the generation subsystem
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation subsystem unavailable: {0}")]
    Unavailable(String),

    #[error("Field generation failed: {0}")]
    FieldFailed(String),

    #[error("Response derivation failed: {0}")]
    DerivationFailed(String),
}

/// A weighted field plus the heuristic generators that contributed to it.
#[derive(Debug, Clone)]
pub struct GeneratedField {
    /// The weighted distribution shaping the candidate.
    pub field: FieldState,
    /// Which generators contributed (recorded in the verification context).
    pub active_generators: Vec<String>,
}

impl GeneratedField {
    pub fn new(field: FieldState) -> Self {
        Self {
            field,
            active_generators: Vec::new(),
        }
    }

    pub fn with_generators(mut self, generators: Vec<String>) -> Self {
        self.active_generators = generators;
        self
    }
}

/// Gateway to the generation subsystem.
///
/// Implementations must be side-effect-free per call: an in-flight
/// invocation may outlive the attempt that requested it when a verification
/// batch times out.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Produce a weighted field for the user's input.
    async fn generate_field(
        &self,
        input: &str,
        context: &ConversationContext,
    ) -> Result<GeneratedField, GenerationError>;

    /// Turn a field state into candidate text, or `None` for deliberate
    /// silence.
    async fn derive_response(&self, field: &FieldState)
    -> Result<Option<String>, GenerationError>;
}
