//! Invocation coordinator - one tool call from request to audit record.
//!
//! Every call follows the same fixed order:
//!
//! 1. Decide (the decision engine elicits missing arguments on the way)
//! 2. Execute, only if allowed, at most once
//! 3. Append exactly one audit record
//!
//! Every path produces one [`ToolCallResult`] and one audit record,
//! including configuration failures, validation failures, cancellation and
//! tool errors. A failed audit append is reported in the result and never
//! hides the tool's outcome.
//!
//! The request ID is claimed in the audit log before anything else happens.
//! A reused ID is refused up front: nothing is decided, nothing runs and no
//! second record is written.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tollgate_approval::{DecisionEngine, DecisionError, DenialReason};
use tollgate_audit::{AuditLog, AuditRecord, ExecutionOutcome};
use tollgate_core::{Arguments, PermissionDecision, Timestamp, ToolCallRequest};
use tollgate_elicitation::ElicitationState;
use tollgate_policy::PolicyStore;
use tracing::Instrument;

use crate::builder::CoordinatorBuilder;
use crate::error::InvocationError;
use crate::executor::ToolExecutor;
use crate::result::ToolCallResult;

/// How the decision phase ended, before execution.
struct Resolution {
    decision: PermissionDecision,
    arguments: Arguments,
    asked: bool,
    elicitation: Option<ElicitationState>,
    decided_at: Timestamp,
    refusal: Option<InvocationError>,
}

impl Resolution {
    fn refused(request: &ToolCallRequest, error: InvocationError, asked: bool) -> Self {
        let elicitation = matches!(error, InvocationError::Validation(_))
            .then_some(ElicitationState::Rejected);
        Self {
            decision: PermissionDecision::Denied,
            arguments: request.arguments().clone(),
            asked,
            elicitation,
            decided_at: Timestamp::now(),
            refusal: Some(error),
        }
    }
}

/// Runs tool calls through decision, execution and audit.
pub struct InvocationCoordinator {
    engine: DecisionEngine,
    executor: Arc<dyn ToolExecutor>,
    audit: Arc<AuditLog>,
}

impl InvocationCoordinator {
    /// Create a coordinator from its parts.
    #[must_use]
    pub fn new(
        engine: DecisionEngine,
        executor: Arc<dyn ToolExecutor>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            engine,
            executor,
            audit,
        }
    }

    /// Start building a coordinator.
    #[must_use]
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    /// The policy store shared with the decision engine.
    #[must_use]
    pub fn policy(&self) -> &Arc<PolicyStore> {
        self.engine.policy()
    }

    /// The audit log every call is recorded in.
    #[must_use]
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// Decide, execute if allowed, and record one tool call.
    ///
    /// Never fails: every problem is reported in
    /// [`ToolCallResult::outcome`] or [`ToolCallResult::audit_error`].
    pub async fn invoke(
        &self,
        request: ToolCallRequest,
        cancel: &CancellationToken,
    ) -> ToolCallResult {
        let span = tracing::info_span!(
            "invoke",
            request_id = %request.id(),
            tool = request.tool()
        );
        self.run(request, cancel).instrument(span).await
    }

    async fn run(&self, request: ToolCallRequest, cancel: &CancellationToken) -> ToolCallResult {
        if let Err(e) = self.audit.reserve(request.id()) {
            tracing::warn!(error = %e, "request refused before decision");
            return ToolCallResult {
                request_id: request.id(),
                decision: PermissionDecision::Denied,
                arguments: request.arguments().clone(),
                outcome: Err(InvocationError::DuplicateRequest {
                    request_id: request.id(),
                }),
                audit_error: Some(e),
            };
        }

        let resolution = self.resolve(&request, cancel).await;

        let outcome = match resolution.refusal {
            Some(error) => Err(error),
            None => self.execute(&request, &resolution.arguments).await,
        };

        let record = AuditRecord {
            request_id: request.id(),
            tool: request.tool().to_string(),
            arguments: resolution.arguments.clone(),
            decision: resolution.decision,
            asked: resolution.asked,
            elicitation: resolution.elicitation,
            outcome: audit_outcome(&outcome),
            requested_at: request.requested_at(),
            decided_at: resolution.decided_at,
            completed_at: Timestamp::now(),
        };

        let audit_error = match self.audit.append(record) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %e, "failed to record audit entry");
                Some(e)
            },
        };

        ToolCallResult {
            request_id: request.id(),
            decision: resolution.decision,
            arguments: resolution.arguments,
            outcome,
            audit_error,
        }
    }

    async fn resolve(&self, request: &ToolCallRequest, cancel: &CancellationToken) -> Resolution {
        match self.engine.decide(request, cancel).await {
            Ok(decision) => {
                let refusal = (!decision.is_allowed()).then(|| {
                    InvocationError::from_denial(decision.denial.unwrap_or(DenialReason::Policy))
                });
                Resolution {
                    decision: decision.decision,
                    arguments: decision.arguments,
                    asked: decision.asked,
                    elicitation: decision.elicitation,
                    decided_at: decision.decided_at,
                    refusal,
                }
            },
            Err(DecisionError::Configuration(e)) => {
                tracing::warn!(error = %e, "tool call refused");
                Resolution::refused(request, e.into(), false)
            },
            Err(DecisionError::Validation { error, asked }) => {
                tracing::warn!(error = %error, "elicited arguments rejected");
                Resolution::refused(request, error.into(), asked)
            },
        }
    }

    async fn execute(
        &self,
        request: &ToolCallRequest,
        arguments: &Arguments,
    ) -> Result<Value, InvocationError> {
        tracing::debug!("executing tool");
        match self.executor.execute(request.tool(), arguments.clone()).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(error = %e, "tool execution failed");
                Err(e.into())
            },
        }
    }
}

fn audit_outcome(outcome: &Result<Value, InvocationError>) -> ExecutionOutcome {
    match outcome {
        Ok(payload) => ExecutionOutcome::Success {
            payload: payload.clone(),
        },
        Err(InvocationError::ToolExecution(e)) => ExecutionOutcome::ToolError {
            message: e.message.clone(),
        },
        Err(e) => ExecutionOutcome::not_executed(e.to_string()),
    }
}

impl fmt::Debug for InvocationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationCoordinator")
            .field("engine", &self.engine)
            .field("audit_entries", &self.audit.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
