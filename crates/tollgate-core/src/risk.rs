//! Risk levels attached to tools and shown with approval prompts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk level for an operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Low risk - read-only or otherwise harmless
    Low,
    /// Medium risk - modifies data
    #[default]
    Medium,
    /// High risk - destructive
    High,
    /// Critical risk - affects system state
    Critical,
}

impl RiskLevel {
    /// Human-readable description of the impact at this level.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Low => "Safe operation with minimal impact",
            Self::Medium => "Moderate impact - modifies data",
            Self::High => "High impact - destructive operation",
            Self::Critical => "Critical impact - system-level operation",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown risk level '{other}'")),
        }
    }
}

/// Assessment of the risk posed by a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The assessed risk level.
    pub level: RiskLevel,
    /// Human-readable explanation.
    pub reason: String,
}

impl RiskAssessment {
    /// Create an assessment with an explicit reason.
    #[must_use]
    pub fn new(level: RiskLevel, reason: impl Into<String>) -> Self {
        Self {
            level,
            reason: reason.into(),
        }
    }

    /// Create an assessment using the level's standard description.
    #[must_use]
    pub fn for_level(level: RiskLevel) -> Self {
        Self::new(level, level.description())
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.reason)
    }
}
