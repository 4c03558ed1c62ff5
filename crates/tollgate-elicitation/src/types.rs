//! Elicitation request, outcome and state types.

use serde::{Deserialize, Serialize};
use std::fmt;
use tollgate_core::{Arguments, ToolSchema};
use uuid::Uuid;

use crate::error::InvalidTransition;

/// Unique identifier for an elicitation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElicitationId(pub Uuid);

impl ElicitationId {
    /// Create a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElicitationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElicitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "elicit:{}", self.0)
    }
}

/// A request for the user to supply missing arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElicitationRequest {
    /// Unique ID of this request.
    pub id: ElicitationId,
    /// The tool the arguments are for.
    pub tool: String,
    /// Schema of the missing fields only. Defaults and descriptions are kept
    /// so a UI can pre-fill and label them.
    pub schema: ToolSchema,
    /// Arguments already known.
    pub partial: Arguments,
    /// Human-readable prompt.
    pub message: String,
}

impl ElicitationRequest {
    /// Names of the fields being requested, in declaration order.
    #[must_use]
    pub fn requested_fields(&self) -> Vec<&str> {
        self.schema.fields().map(|(name, _)| name).collect()
    }
}

/// How the user resolved an elicitation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "content", rename_all = "snake_case")]
pub enum ElicitationOutcome {
    /// The user supplied values.
    Accept(Arguments),
    /// The user explicitly refused.
    Decline,
    /// The user dismissed the prompt, or it was cancelled or timed out.
    Cancel,
}

impl ElicitationOutcome {
    /// The terminal state this outcome leads to, assuming a valid payload.
    #[must_use]
    pub fn state(&self) -> ElicitationState {
        match self {
            Self::Accept(_) => ElicitationState::Accepted,
            Self::Decline => ElicitationState::Declined,
            Self::Cancel => ElicitationState::Cancelled,
        }
    }
}

/// Lifecycle of an elicitation request.
///
/// `Pending` moves to exactly one terminal state. `Rejected` marks an
/// `Accept` whose payload failed validation. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElicitationState {
    /// Waiting on the user.
    Pending,
    /// Valid values were supplied.
    Accepted,
    /// The user refused.
    Declined,
    /// Dismissed, cancelled or timed out.
    Cancelled,
    /// Values were supplied but failed validation.
    Rejected,
}

impl ElicitationState {
    /// Check whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when leaving a terminal state or when
    /// `next` is `Pending`.
    pub fn advance(self, next: Self) -> Result<Self, InvalidTransition> {
        if self.is_terminal() || !next.is_terminal() {
            return Err(InvalidTransition {
                from: self,
                to: next,
            });
        }
        Ok(next)
    }
}

impl fmt::Display for ElicitationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Declined => write!(f, "declined"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}
