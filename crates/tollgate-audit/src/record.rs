//! Audit record types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tollgate_core::{Arguments, PermissionDecision, RequestId, Timestamp};
use tollgate_elicitation::ElicitationState;

/// What happened to a tool call after the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The tool ran and returned a result.
    Success {
        /// The tool's result.
        payload: Value,
    },
    /// The tool ran and reported an error.
    ToolError {
        /// Error message from the tool.
        message: String,
    },
    /// The tool was never run.
    NotExecuted {
        /// Why it was not run.
        reason: String,
    },
}

impl ExecutionOutcome {
    /// Create a "not executed" outcome.
    #[must_use]
    pub fn not_executed(reason: impl Into<String>) -> Self {
        Self::NotExecuted {
            reason: reason.into(),
        }
    }

    /// Check whether the tool actually ran.
    #[must_use]
    pub fn was_executed(&self) -> bool {
        !matches!(self, Self::NotExecuted { .. })
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { .. } => write!(f, "success"),
            Self::ToolError { message } => write!(f, "tool error: {message}"),
            Self::NotExecuted { reason } => write!(f, "not executed: {reason}"),
        }
    }
}

/// The complete account of one tool call.
///
/// Exactly one record exists per request ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The request this record describes.
    pub request_id: RequestId,
    /// The tool that was requested.
    pub tool: String,
    /// Arguments as decided on, including any elicited values.
    pub arguments: Arguments,
    /// The final decision: `Allowed` or `Denied`.
    pub decision: PermissionDecision,
    /// Whether the call went through an interactive approval prompt.
    pub asked: bool,
    /// How elicitation resolved, if it was needed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elicitation: Option<ElicitationState>,
    /// Execution result.
    pub outcome: ExecutionOutcome,
    /// When the request was created.
    pub requested_at: Timestamp,
    /// When the decision was reached.
    pub decided_at: Timestamp,
    /// When the call finished.
    pub completed_at: Timestamp,
}

impl AuditRecord {
    /// One-line summary, e.g. `send_email allowed (asked) success`.
    #[must_use]
    pub fn summary(&self) -> String {
        let asked = if self.asked { " (asked)" } else { "" };
        format!("{} {}{asked} {}", self.tool, self.decision, self.outcome)
    }
}
