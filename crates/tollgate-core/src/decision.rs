//! The permission decision matrix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification applied to every tool call.
///
/// `Asked` is transitional: the decision engine always resolves it to
/// `Allowed` or `Denied` before a call proceeds. It appears in audit records
/// only to note that the call went through an interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionDecision {
    /// The call may execute.
    Allowed,
    /// The call must not execute.
    Denied,
    /// The call is waiting on the user.
    Asked,
}

impl PermissionDecision {
    /// Check whether this decision permits execution.
    #[must_use]
    pub fn permits_execution(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Check whether this decision is final (`Allowed` or `Denied`).
    #[must_use]
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Asked)
    }
}

impl fmt::Display for PermissionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "allowed"),
            Self::Denied => write!(f, "denied"),
            Self::Asked => write!(f, "asked"),
        }
    }
}

impl std::str::FromStr for PermissionDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allowed" | "allow" => Ok(Self::Allowed),
            "denied" | "deny" => Ok(Self::Denied),
            "asked" | "ask" => Ok(Self::Asked),
            other => Err(format!(
                "unknown decision '{other}'; expected allowed, denied or asked"
            )),
        }
    }
}
