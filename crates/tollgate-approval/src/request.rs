//! Approval request and response types.
//!
//! An [`ApprovalRequest`] is what the user sees when a tool has no
//! remembered policy: the tool, its final arguments and a risk assessment.
//! The [`ApprovalResponse`] carries the one-time answer and whether to
//! remember it for the rest of the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use tollgate_core::{Arguments, RequestId, RiskAssessment};

/// A request for the user to approve one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// The tool call being approved.
    pub request_id: RequestId,
    /// The tool to run.
    pub tool: String,
    /// Arguments the tool will run with, after elicitation.
    pub arguments: Arguments,
    /// Risk shown alongside the prompt.
    pub assessment: RiskAssessment,
    /// Tool description, if the schema has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApprovalRequest {
    /// Create a new approval request.
    #[must_use]
    pub fn new(
        request_id: RequestId,
        tool: impl Into<String>,
        arguments: Arguments,
        assessment: RiskAssessment,
    ) -> Self {
        Self {
            request_id,
            tool: tool.into(),
            arguments,
            assessment,
            description: None,
        }
    }

    /// Attach the tool description.
    #[must_use]
    pub fn with_description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(Into::into);
        self
    }
}

impl fmt::Display for ApprovalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permission required for tool: {} {}", self.tool, self.assessment)
    }
}

/// The user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Run the tool.
    Approve,
    /// Do not run the tool.
    Deny,
}

impl ApprovalDecision {
    /// Check if this decision approves the call.
    #[must_use]
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approve)
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// Response to an [`ApprovalRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalResponse {
    /// The answer for this call.
    pub decision: ApprovalDecision,
    /// Apply the answer to every later call of the same tool.
    #[serde(default)]
    pub remember: bool,
}

impl ApprovalResponse {
    /// Approve this call only.
    #[must_use]
    pub fn approve() -> Self {
        Self {
            decision: ApprovalDecision::Approve,
            remember: false,
        }
    }

    /// Approve this and every later call of the tool.
    #[must_use]
    pub fn approve_always() -> Self {
        Self {
            remember: true,
            ..Self::approve()
        }
    }

    /// Deny this call only.
    #[must_use]
    pub fn deny() -> Self {
        Self {
            decision: ApprovalDecision::Deny,
            remember: false,
        }
    }

    /// Deny this and every later call of the tool.
    #[must_use]
    pub fn deny_always() -> Self {
        Self {
            remember: true,
            ..Self::deny()
        }
    }
}
