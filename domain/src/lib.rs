//! Domain layer for vigil
//!
//! This crate contains the core safety-verification logic: verifier agents,
//! the weighted consensus engine, and the policy configuration. It has no
//! dependencies on async runtime, I/O, or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Verifier panel
//!
//! A closed set of stateless, deterministic agents, each voting
//! safe/concern/harmful on one candidate response with a confidence level.
//! Agents carry a priority class (standard/high/critical) that determines
//! their weight in consensus and, for critical agents, veto eligibility.
//!
//! ## Weighted consensus
//!
//! The engine aggregates a complete batch of votes into one decision:
//! deliver, regenerate, or escalate. The rules are conservative, not
//! democratic - ambiguity regenerates, and a single confident critical
//! objection escalates regardless of other votes.
//!
//! ## Escalation as user sovereignty
//!
//! Escalation is a designed terminal outcome, not a refusal: the user gets a
//! transparent explanation and explicit choices instead of silence.

pub mod agents;
pub mod config;
pub mod context;
pub mod core;
pub mod response;
pub mod util;
pub mod verdict;

// Re-export commonly used types
pub use agents::{
    BoundaryVerifier, CrisisVerifier, Priority, TimingVerifier, Verifier, VerifierAgent,
};
pub use config::{
    ConfigIssue, ConsensusConfig, ExecutionParams, PriorityWeights, Severity, SovereigntyPolicy,
};
pub use context::{ContextAdjustment, ConversationContext, FieldState, VerificationContext};
pub use core::error::ConsensusError;
pub use response::{
    GenerationAttempt, TimingBreakdown, TransparencyReport, UserChoice, VerifiedResponse,
};
pub use verdict::{
    ConsensusAction, ConsensusEngine, ConsensusResult, SafetyVote, VerificationResult, explain,
};
