//! Permission decision engine - decides whether a tool call may run.
//!
//! The [`DecisionEngine`] coordinates between:
//! - The [`SchemaRegistry`] (what arguments a tool needs)
//! - The [`PolicyStore`] (remembered per-tool choices)
//! - The [`ElicitationEngine`] (collecting missing arguments)
//! - The [`ApprovalHandler`] trait (UI implementations)
//!
//! # Decision Flow
//!
//! 1. Resolve the tool's schema; an unknown tool is a configuration error
//! 2. Take the tool's policy gate and read its entry
//! 3. `AlwaysDeny`: deny without prompting
//! 4. `AlwaysAllow`: elicit only if arguments are incomplete, then allow
//! 5. No entry or `Ask`: elicit if needed, then ask the user
//! 6. If the user asked to remember the answer, record it through the gate
//!
//! On the asking path the policy gate is held from step 2 until the decision
//! is returned, so concurrent calls to one tool see each other's remembered
//! choices in order. A stored `AlwaysAllow` or `AlwaysDeny` releases the gate
//! right after it is read. Cancellation is honored at every wait and resolves as a denial.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tollgate_core::{
    Arguments, ConfigurationError, RiskAssessment, SchemaRegistry, ToolCallRequest, ToolSchema,
};
use tollgate_elicitation::{ElicitationEngine, ElicitationOutcome, ElicitationState};
use tollgate_policy::{PolicyEntry, PolicyGuard, PolicyStore};

use crate::decision::{Decision, DenialReason};
use crate::error::{DecisionError, DecisionResult};
use crate::request::{ApprovalRequest, ApprovalResponse};

/// Trait for UI implementations that present approval requests to users.
///
/// # Example
///
/// ```rust,ignore
/// use tollgate_approval::{ApprovalHandler, ApprovalRequest, ApprovalResponse};
///
/// struct CliHandler;
///
/// #[async_trait::async_trait]
/// impl ApprovalHandler for CliHandler {
///     async fn request_approval(&self, request: ApprovalRequest) -> Option<ApprovalResponse> {
///         // Present to user via terminal...
///         None // User didn't respond
///     }
/// }
/// ```
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    /// Present an approval request to the user and wait for a response.
    ///
    /// Returns `None` if the user dismissed the prompt without answering.
    async fn request_approval(&self, request: ApprovalRequest) -> Option<ApprovalResponse>;
}

/// Arguments after elicitation, or the denial that ended it.
enum Gathered {
    Ready {
        arguments: Arguments,
        elicitation: Option<ElicitationState>,
    },
    Stopped(Decision),
}

/// Decides whether tool calls may run.
pub struct DecisionEngine {
    registry: Arc<dyn SchemaRegistry>,
    policy: Arc<PolicyStore>,
    elicitation: ElicitationEngine,
    handler: Arc<dyn ApprovalHandler>,
    approval_timeout: Option<Duration>,
}

impl DecisionEngine {
    /// Create a new decision engine with no approval timeout.
    #[must_use]
    pub fn new(
        registry: Arc<dyn SchemaRegistry>,
        policy: Arc<PolicyStore>,
        elicitation: ElicitationEngine,
        handler: Arc<dyn ApprovalHandler>,
    ) -> Self {
        Self {
            registry,
            policy,
            elicitation,
            handler,
            approval_timeout: None,
        }
    }

    /// Treat an unanswered approval prompt as cancelled after `timeout`.
    #[must_use]
    pub fn with_approval_timeout(mut self, timeout: Duration) -> Self {
        self.approval_timeout = Some(timeout);
        self
    }

    /// The policy store this engine reads and updates.
    #[must_use]
    pub fn policy(&self) -> &Arc<PolicyStore> {
        &self.policy
    }

    /// Decide whether `request` may run.
    ///
    /// Always returns `Allowed` or `Denied`. Cancellation of `cancel` at any
    /// point before the decision yields `Denied` with
    /// [`DenialReason::Cancelled`] and leaves the policy store unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Configuration`] for a tool with no schema and
    /// [`DecisionError::Validation`] when elicited values are invalid.
    pub async fn decide(
        &self,
        request: &ToolCallRequest,
        cancel: &CancellationToken,
    ) -> DecisionResult<Decision> {
        let tool = request.tool();
        let schema = self.registry.schema_for(tool).await.ok_or_else(|| {
            ConfigurationError::UnknownTool {
                tool: tool.to_string(),
            }
        })?;

        let guard = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(request_id = %request.id(), tool, "cancelled waiting for policy gate");
                return Ok(Decision::denied(
                    request.arguments().clone(),
                    DenialReason::Cancelled,
                    false,
                    None,
                ));
            },
            guard = self.policy.acquire(tool) => guard,
        };

        // Only the prompting path needs the gate past this point.
        let entry = guard.entry();
        let decision = match entry {
            Some(PolicyEntry::AlwaysDeny) => {
                drop(guard);
                Decision::denied(
                    request.arguments().clone(),
                    DenialReason::Policy,
                    false,
                    None,
                )
            },
            Some(PolicyEntry::AlwaysAllow) => {
                drop(guard);
                match self.gather(request, &schema, false, cancel).await? {
                    Gathered::Ready {
                        arguments,
                        elicitation,
                    } => Decision::allowed(arguments, false, elicitation),
                    Gathered::Stopped(decision) => decision,
                }
            },
            None | Some(PolicyEntry::Ask) => match self.gather(request, &schema, true, cancel).await? {
                Gathered::Ready {
                    arguments,
                    elicitation,
                } => {
                    self.ask(&guard, request, &schema, arguments, elicitation, cancel)
                        .await
                },
                Gathered::Stopped(decision) => decision,
            },
        };

        tracing::info!(
            request_id = %request.id(),
            tool,
            decision = %decision.decision,
            asked = decision.asked,
            denial = ?decision.denial,
            "permission decided"
        );
        Ok(decision)
    }

    /// Collect missing arguments, if any.
    async fn gather(
        &self,
        request: &ToolCallRequest,
        schema: &ToolSchema,
        asked: bool,
        cancel: &CancellationToken,
    ) -> DecisionResult<Gathered> {
        let partial = request.arguments();
        if schema.is_complete(partial) {
            return Ok(Gathered::Ready {
                arguments: partial.clone(),
                elicitation: None,
            });
        }

        let outcome = self
            .elicitation
            .elicit(request.tool(), schema, partial, cancel)
            .await
            .map_err(|error| DecisionError::Validation { error, asked })?;

        let state = outcome.state();
        Ok(match outcome {
            ElicitationOutcome::Accept(arguments) => Gathered::Ready {
                arguments,
                elicitation: Some(state),
            },
            ElicitationOutcome::Decline => Gathered::Stopped(Decision::denied(
                partial.clone(),
                DenialReason::Declined,
                asked,
                Some(state),
            )),
            ElicitationOutcome::Cancel => Gathered::Stopped(Decision::denied(
                partial.clone(),
                DenialReason::Cancelled,
                asked,
                Some(state),
            )),
        })
    }

    /// Present the approval prompt and apply the answer.
    async fn ask(
        &self,
        guard: &PolicyGuard<'_>,
        request: &ToolCallRequest,
        schema: &ToolSchema,
        arguments: Arguments,
        elicitation: Option<ElicitationState>,
        cancel: &CancellationToken,
    ) -> Decision {
        let tool = request.tool();
        let prompt = ApprovalRequest::new(
            request.id(),
            tool,
            arguments.clone(),
            RiskAssessment::for_level(schema.risk()),
        )
        .with_description(schema.description());

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            response = self.await_response(tool, self.handler.request_approval(prompt)) => response,
        };

        let Some(response) = response else {
            return Decision::denied(arguments, DenialReason::Cancelled, true, elicitation);
        };

        if response.remember {
            let entry = if response.decision.is_approved() {
                PolicyEntry::AlwaysAllow
            } else {
                PolicyEntry::AlwaysDeny
            };
            if let Err(e) = guard.record(entry, true).await {
                // Log error but still apply the one-time answer
                tracing::warn!(tool, "failed to store remembered choice: {e}");
            }
        }

        if response.decision.is_approved() {
            Decision::allowed(arguments, true, elicitation)
        } else {
            Decision::denied(arguments, DenialReason::User, true, elicitation)
        }
    }

    async fn await_response<F>(&self, tool: &str, response: F) -> Option<ApprovalResponse>
    where
        F: Future<Output = Option<ApprovalResponse>>,
    {
        match self.approval_timeout {
            Some(timeout) => tokio::time::timeout(timeout, response)
                .await
                .unwrap_or_else(|_| {
                    tracing::warn!(tool, ?timeout, "approval request timed out");
                    None
                }),
            None => response.await,
        }
    }
}

impl fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("policy", &self.policy)
            .field("elicitation", &self.elicitation)
            .field("approval_timeout", &self.approval_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
