//! Decisions returned by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use tollgate_core::{Arguments, PermissionDecision, Timestamp};
use tollgate_elicitation::ElicitationState;

/// Why a call was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// A remembered `AlwaysDeny` policy.
    Policy,
    /// The user denied the approval prompt.
    User,
    /// The user declined to supply missing arguments.
    Declined,
    /// The caller cancelled, or a prompt was dismissed or timed out.
    Cancelled,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Policy => write!(f, "denied by policy"),
            Self::User => write!(f, "denied by user"),
            Self::Declined => write!(f, "declined"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The engine's final answer for one request.
///
/// `decision` is always `Allowed` or `Denied`; `asked` records whether the
/// call passed through the interactive `Asked` state on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// `Allowed` or `Denied`.
    pub decision: PermissionDecision,
    /// Arguments to run with, including elicited values.
    pub arguments: Arguments,
    /// Set when `decision` is `Denied`.
    pub denial: Option<DenialReason>,
    /// Whether the call went through an approval prompt.
    pub asked: bool,
    /// How elicitation resolved, if it was needed.
    pub elicitation: Option<ElicitationState>,
    /// When the decision was reached.
    pub decided_at: Timestamp,
}

impl Decision {
    pub(crate) fn allowed(
        arguments: Arguments,
        asked: bool,
        elicitation: Option<ElicitationState>,
    ) -> Self {
        Self {
            decision: PermissionDecision::Allowed,
            arguments,
            denial: None,
            asked,
            elicitation,
            decided_at: Timestamp::now(),
        }
    }

    pub(crate) fn denied(
        arguments: Arguments,
        reason: DenialReason,
        asked: bool,
        elicitation: Option<ElicitationState>,
    ) -> Self {
        Self {
            decision: PermissionDecision::Denied,
            arguments,
            denial: Some(reason),
            asked,
            elicitation,
            decided_at: Timestamp::now(),
        }
    }

    /// Check whether the tool may run.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.decision.permits_execution()
    }
}
