//! Elicitation engine - collects missing required arguments from the user.
//!
//! # Flow
//!
//! 1. Compute the required fields absent (or `null`) in the partial arguments
//! 2. If none are missing, return `Accept` with the partial arguments; the
//!    presenter is never contacted
//! 3. Build an [`ElicitationRequest`] whose schema holds only the missing fields
//! 4. Present it, racing cancellation and the optional timeout
//! 5. Validate an `Accept` payload and merge it into the partial arguments

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tollgate_core::{Arguments, ToolSchema};

use crate::error::ValidationError;
use crate::types::{ElicitationId, ElicitationOutcome, ElicitationRequest, ElicitationState};

/// Presents elicitation requests to the user.
///
/// Frontends implement this to render a form for the requested fields.
///
/// # Example
///
/// ```rust,ignore
/// use tollgate_elicitation::{ElicitationOutcome, ElicitationPresenter, ElicitationRequest};
///
/// struct DismissAll;
///
/// #[async_trait::async_trait]
/// impl ElicitationPresenter for DismissAll {
///     async fn present(&self, _request: ElicitationRequest) -> ElicitationOutcome {
///         ElicitationOutcome::Cancel
///     }
/// }
/// ```
#[async_trait]
pub trait ElicitationPresenter: Send + Sync {
    /// Show the request and wait for the user's answer.
    async fn present(&self, request: ElicitationRequest) -> ElicitationOutcome;
}

/// Drives elicitation requests through an [`ElicitationPresenter`].
pub struct ElicitationEngine {
    presenter: Arc<dyn ElicitationPresenter>,
    timeout: Option<Duration>,
}

impl ElicitationEngine {
    /// Create an engine with no timeout.
    #[must_use]
    pub fn new(presenter: Arc<dyn ElicitationPresenter>) -> Self {
        Self {
            presenter,
            timeout: None,
        }
    }

    /// Resolve unanswered requests as `Cancel` after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Collect any missing required arguments for `tool`.
    ///
    /// Returns `Accept` with the complete, merged arguments, or `Decline` /
    /// `Cancel` as answered. Neither is retried.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the user accepts with a payload that
    /// omits a requested field, supplies a value of the wrong type or outside
    /// the allowed options, or includes a field that was not requested.
    pub async fn elicit(
        &self,
        tool: &str,
        schema: &ToolSchema,
        partial: &Arguments,
        cancel: &CancellationToken,
    ) -> Result<ElicitationOutcome, ValidationError> {
        let missing = schema.missing_fields(partial);
        if missing.is_empty() {
            return Ok(ElicitationOutcome::Accept(partial.clone()));
        }

        let request = ElicitationRequest {
            id: ElicitationId::new(),
            tool: tool.to_string(),
            schema: schema.subset(&missing),
            partial: partial.clone(),
            message: prompt_message(tool, &missing),
        };
        let id = request.id;
        tracing::debug!(%id, tool, missing = ?missing, "requesting missing arguments");

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => ElicitationOutcome::Cancel,
            outcome = self.await_answer(tool, self.presenter.present(request)) => outcome,
        };

        let result = match outcome {
            ElicitationOutcome::Accept(filled) => {
                validate(tool, schema, &missing, partial, filled).map(ElicitationOutcome::Accept)
            },
            other => Ok(other),
        };
        let state = resolved_state(&result);
        tracing::debug!(%id, tool, %state, "elicitation resolved");
        result
    }

    async fn await_answer<F>(&self, tool: &str, answer: F) -> ElicitationOutcome
    where
        F: Future<Output = ElicitationOutcome>,
    {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, answer)
                .await
                .unwrap_or_else(|_| {
                    tracing::warn!(tool, ?timeout, "elicitation timed out");
                    ElicitationOutcome::Cancel
                }),
            None => answer.await,
        }
    }
}

/// The terminal state a finished request lands in.
fn resolved_state(result: &Result<ElicitationOutcome, ValidationError>) -> ElicitationState {
    match result {
        Ok(outcome) => outcome.state(),
        Err(_) => ElicitationState::Rejected,
    }
}

impl std::fmt::Debug for ElicitationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElicitationEngine")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn prompt_message(tool: &str, missing: &[String]) -> String {
    format!(
        "'{tool}' needs more information before it can run: {}",
        missing.join(", ")
    )
}

/// Check an accepted payload against the requested fields and merge it.
fn validate(
    tool: &str,
    schema: &ToolSchema,
    missing: &[String],
    partial: &Arguments,
    filled: Arguments,
) -> Result<Arguments, ValidationError> {
    let mut problems = Vec::new();

    for name in missing {
        match filled.get(name) {
            None | Some(serde_json::Value::Null) => {
                problems.push(format!("missing required field '{name}'"));
            },
            Some(value) => {
                if let Some(spec) = schema.field(name)
                    && let Err(problem) = spec.check(value)
                {
                    problems.push(format!("field '{name}': {problem}"));
                }
            },
        }
    }
    for name in filled.keys() {
        if !missing.contains(name) {
            problems.push(format!("unexpected field '{name}'"));
        }
    }

    if !problems.is_empty() {
        tracing::warn!(tool, problems = ?problems, "rejected elicitation payload");
        return Err(ValidationError {
            tool: tool.to_string(),
            problems,
        });
    }

    let mut merged = partial.clone();
    merged.extend(filled);
    Ok(merged)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
