//! Verify Response use case - the self-auditing orchestrator.
//!
//! Drives generation→verification cycles for one conversational turn:
//! ask the generation subsystem for a candidate, fan the verification
//! context out to the whole panel in parallel, aggregate votes through the
//! consensus engine, then deliver, regenerate with increased restraint, or
//! escalate to the user.
//!
//! Failure policy has two distinct layers: an isolated agent fault is
//! substituted fail-open (availability over strictness), while a
//! whole-batch timeout is substituted fail-safe (a verification system that
//! cannot be reached in time must never silently approve).

use crate::config::VerifierConfig;
use crate::ports::audit::{AuditEvent, AuditSink, NoAuditSink};
use crate::ports::generation::{GenerationError, ResponseGenerator};
use crate::ports::progress::{NoVerificationProgress, VerificationProgress};
use serde_json::json;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vigil_domain::{
    ConsensusEngine, ConsensusError, ConsensusResult, ContextAdjustment, ConversationContext,
    GenerationAttempt, SovereigntyPolicy, TimingBreakdown, TransparencyReport, UserChoice,
    VerificationContext, VerificationResult, VerifiedResponse, Verifier, VerifierAgent, explain,
};

/// Terse escalation message used when transparency-by-default is off.
const ESCALATION_INVITE: &str =
    "I'm having trouble finding the right response, want to know why?";

/// Errors that can surface from a verified turn
///
/// Ordinary safety outcomes (escalation, regeneration) are never errors;
/// only misconfiguration, generation faults, and retry exhaustion are.
#[derive(Debug, thiserror::Error)]
pub enum VerifyResponseError {
    #[error("Verifier panel misconfigured: {0}")]
    Config(#[from] ConsensusError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("No approvable response after {attempts} attempts")]
    MaxAttemptsExceeded { attempts: usize },
}

/// Use case for producing one verified response.
///
/// Explicitly constructed and dependency-injected; the caller owns the
/// instance for the process lifetime. Config updates via
/// [`update_config`](Self::update_config) apply to subsequent turns only.
pub struct VerifyResponseUseCase<G: ResponseGenerator + 'static> {
    generator: Arc<G>,
    panel: Vec<Verifier>,
    config: RwLock<VerifierConfig>,
    audit: Arc<dyn AuditSink>,
}

impl<G: ResponseGenerator + 'static> VerifyResponseUseCase<G> {
    /// Create the orchestrator with the default panel, default config, and
    /// no audit sink.
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            panel: Verifier::default_panel(),
            config: RwLock::new(VerifierConfig::default()),
            audit: Arc::new(NoAuditSink),
        }
    }

    /// Replace the verifier panel.
    pub fn with_panel(mut self, panel: Vec<Verifier>) -> Self {
        self.panel = panel;
        self
    }

    /// Replace the configuration container.
    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = RwLock::new(config);
        self
    }

    /// Attach an audit sink.
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Current configuration (a snapshot).
    pub fn config(&self) -> VerifierConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the configuration. Applies to subsequent turns only.
    pub fn update_config(&self, config: VerifierConfig) {
        info!("verifier config updated");
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }

    /// Human-readable transparency text for a consensus decision.
    pub fn explain_consensus(&self, consensus: &ConsensusResult) -> String {
        explain(consensus)
    }

    /// Record explicit user consent to receive an escalated response.
    ///
    /// Returns whether the override is allowed by policy. The consent is
    /// audited distinctly from an ordinary delivery.
    pub fn record_proceed_anyway(&self, consensus: &ConsensusResult) -> bool {
        let allowed = self.config().sovereignty().allow_proceed_anyway;
        if allowed {
            warn!(
                audit_id = %consensus.audit_id,
                "user consented to proceed past a safety escalation"
            );
            self.audit.record(AuditEvent::new(
                "proceed_anyway",
                json!({
                    "audit_id": consensus.audit_id,
                    "safety_score": consensus.safety_score,
                    "verifying_agents": consensus.verifying_agents,
                }),
            ));
        } else {
            warn!(
                audit_id = %consensus.audit_id,
                "proceed-anyway requested but not allowed by policy"
            );
        }
        allowed
    }

    /// Execute one verified turn with default (no-op) progress.
    pub async fn generate_verified_response(
        &self,
        context: ConversationContext,
    ) -> Result<VerifiedResponse, VerifyResponseError> {
        self.generate_verified_response_with_progress(context, &NoVerificationProgress)
            .await
    }

    /// Execute one verified turn with progress callbacks.
    pub async fn generate_verified_response_with_progress(
        &self,
        mut context: ConversationContext,
        progress: &dyn VerificationProgress,
    ) -> Result<VerifiedResponse, VerifyResponseError> {
        let config = self.config();
        let turn_start = Instant::now();

        if !config.execution().verification_enabled {
            warn!("verification disabled by deployment switch: delivering unverified");
            let candidate = self.generate_candidate(&context).await?.1;
            let timing = TimingBreakdown {
                generation_ms: turn_start.elapsed().as_millis() as u64,
                verification_ms: 0,
                total_ms: turn_start.elapsed().as_millis() as u64,
            };
            return Ok(VerifiedResponse::unverified(
                candidate.unwrap_or_default(),
                timing,
            ));
        }

        let max_attempts = config.execution().max_attempts;
        let mut attempts: Vec<GenerationAttempt> = Vec::new();
        let mut pending_adjustment: Option<ContextAdjustment> = None;
        let mut generation_ms = 0u64;
        let mut verification_ms = 0u64;

        for attempt in 1..=max_attempts {
            progress.on_attempt_start(attempt, max_attempts);
            info!(attempt, max_attempts, "generation attempt");

            let gen_start = Instant::now();
            let (generated, candidate) = self.generate_candidate(&context).await?;
            generation_ms += gen_start.elapsed().as_millis() as u64;

            let snapshot = VerificationContext::from_parts(
                &context,
                candidate.clone(),
                &generated.field,
                generated.active_generators,
            );

            let verify_start = Instant::now();
            let results = self
                .run_panel(&snapshot, config.execution().verification_timeout, progress)
                .await;
            verification_ms += verify_start.elapsed().as_millis() as u64;

            let consensus = ConsensusEngine::calculate(results, &self.panel, config.consensus())?;
            progress.on_consensus(&consensus.action, consensus.safety_score);
            self.audit.record(AuditEvent::new(
                "consensus",
                json!({
                    "audit_id": consensus.audit_id,
                    "attempt": attempt,
                    "action": consensus.action.to_string(),
                    "approved": consensus.approved,
                    "safety_score": consensus.safety_score,
                    "verifying_agents": consensus.verifying_agents,
                }),
            ));

            let attempt_record = GenerationAttempt::new(
                attempt,
                candidate.clone(),
                consensus.clone(),
                pending_adjustment.take(),
            );
            attempts.push(attempt_record);

            let timing = TimingBreakdown {
                generation_ms,
                verification_ms,
                total_ms: turn_start.elapsed().as_millis() as u64,
            };

            if consensus.action.is_deliver() {
                info!(
                    audit_id = %consensus.audit_id,
                    score = consensus.safety_score,
                    "consensus approved delivery"
                );
                // Approved silence delivers as an empty response; silence is
                // a legitimate outcome of the field, not a failure.
                return Ok(VerifiedResponse::delivered(
                    candidate.unwrap_or_default(),
                    consensus,
                    timing,
                    attempt - 1,
                ));
            }

            if consensus.action.is_escalate() {
                return Ok(self.build_escalation(
                    consensus,
                    timing,
                    attempt - 1,
                    config.sovereignty(),
                ));
            }

            // Regenerate.
            if attempt == max_attempts {
                warn!(attempts = max_attempts, "retry budget exhausted");
                self.audit.record(AuditEvent::new(
                    "max_attempts_exceeded",
                    json!({
                        "attempts": max_attempts,
                        "attempt_audit_ids": attempts
                            .iter()
                            .map(|a| a.consensus.audit_id.clone())
                            .collect::<Vec<_>>(),
                    }),
                ));
                return Err(VerifyResponseError::MaxAttemptsExceeded {
                    attempts: max_attempts,
                });
            }

            let adjustment = ContextAdjustment::increase_restraint(consensus.mentions_crisis());
            adjustment.apply(&mut context);
            debug!(
                strategy = %adjustment.strategy,
                crisis = adjustment.raise_crisis_flag,
                "adjusting context for regeneration"
            );
            pending_adjustment = Some(adjustment);
        }

        // Only reachable with max_attempts == 0.
        Err(VerifyResponseError::MaxAttemptsExceeded {
            attempts: max_attempts,
        })
    }

    /// Ask the generation subsystem for one candidate.
    async fn generate_candidate(
        &self,
        context: &ConversationContext,
    ) -> Result<(crate::ports::generation::GeneratedField, Option<String>), VerifyResponseError>
    {
        let generated = self
            .generator
            .generate_field(&context.user_input, context)
            .await?;
        let candidate = self.generator.derive_response(&generated.field).await?;
        Ok((generated, candidate))
    }

    /// Fan the context out to the whole panel and gather a complete result
    /// set.
    ///
    /// Barrier semantics: the returned vector always has one result per
    /// panel member - real votes, fail-open substitutes for faulted or
    /// cancelled agents, or fail-safe substitutes for a timed-out batch.
    async fn run_panel(
        &self,
        context: &VerificationContext,
        budget: Duration,
        progress: &dyn VerificationProgress,
    ) -> Vec<VerificationResult> {
        let token = CancellationToken::new();
        let mut join_set = JoinSet::new();

        for verifier in &self.panel {
            let verifier = *verifier;
            let snapshot = context.clone();
            let cancel = token.child_token();

            join_set.spawn(async move {
                let name = verifier.name();
                // A cancelled call is treated identically to a failed one.
                if cancel.is_cancelled() {
                    return VerificationResult::agent_failed(name);
                }
                verifier.verify(&snapshot)
            });
        }

        let gather = async {
            let mut results = Vec::with_capacity(self.panel.len());
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(result) => {
                        progress.on_agent_complete(&result.agent, &result.vote);
                        results.push(result);
                    }
                    Err(e) => {
                        warn!("verifier task failed: {e}");
                    }
                }
            }
            results
        };

        match tokio::time::timeout(budget, gather).await {
            Ok(mut results) => {
                // Substitute fail-open for any agent lost to a task fault so
                // the engine always sees the complete panel.
                for verifier in &self.panel {
                    if !results.iter().any(|r| r.agent == verifier.name()) {
                        warn!(agent = verifier.name(), "substituting fail-open vote");
                        results.push(VerificationResult::agent_failed(verifier.name()));
                    }
                }
                results
            }
            Err(_) => {
                token.cancel();
                warn!(
                    budget_ms = budget.as_millis() as u64,
                    "verification batch timed out: forcing regeneration"
                );
                self.panel
                    .iter()
                    .map(|v| VerificationResult::timed_out(v.name()))
                    .collect()
            }
        }
    }

    /// Build the transparency-and-choice response for an escalation.
    ///
    /// This path never silently drops the turn: the user always receives a
    /// message and explicit choices.
    fn build_escalation(
        &self,
        consensus: ConsensusResult,
        timing: TimingBreakdown,
        regenerations: usize,
        policy: &SovereigntyPolicy,
    ) -> VerifiedResponse {
        let report = TransparencyReport::from_consensus(&consensus);
        let message = if policy.transparency_by_default {
            explain(&consensus)
        } else {
            ESCALATION_INVITE.to_string()
        };

        let mut choices = vec![UserChoice::Rephrase, UserChoice::ViewTransparency];
        if policy.allow_proceed_anyway {
            choices.push(UserChoice::ProceedAnyway);
        }

        info!(
            audit_id = %consensus.audit_id,
            objections = report.objections.len(),
            "escalating to user sovereignty"
        );
        self.audit.record(AuditEvent::new(
            "escalation",
            json!({
                "audit_id": consensus.audit_id,
                "safety_score": consensus.safety_score,
                "choices": choices,
            }),
        ));

        VerifiedResponse::escalated(message, consensus, timing, regenerations, choices, report)
    }
}
