//! Runtime error types.

use thiserror::Error;
use tollgate_approval::DenialReason;
use tollgate_audit::AuditError;
use tollgate_core::{ConfigurationError, RequestId};
use tollgate_elicitation::ValidationError;
use tollgate_policy::PolicyError;

/// A tool reported failure while running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ToolExecutionError {
    /// What went wrong, as reported by the tool.
    pub message: String,
}

impl ToolExecutionError {
    /// Create a new execution error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why an invocation produced no tool result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The tool has no registered schema.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Elicited arguments did not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Permission was refused.
    #[error("{reason}")]
    Denied {
        /// Who or what refused.
        reason: DenialReason,
    },

    /// The caller cancelled, or a prompt was dismissed or timed out.
    #[error("cancelled")]
    Cancelled,

    /// The request ID was already used by an earlier invocation.
    #[error("request {request_id} was already invoked")]
    DuplicateRequest {
        /// The reused ID.
        request_id: RequestId,
    },

    /// The tool ran and failed.
    #[error("tool execution failed: {0}")]
    ToolExecution(#[from] ToolExecutionError),
}

impl InvocationError {
    /// Map a denial to the error the caller sees.
    #[must_use]
    pub fn from_denial(reason: DenialReason) -> Self {
        match reason {
            DenialReason::Cancelled => Self::Cancelled,
            reason => Self::Denied { reason },
        }
    }

    /// Whether the tool was never started.
    #[must_use]
    pub fn is_pre_execution(&self) -> bool {
        !matches!(self, Self::ToolExecution(_))
    }
}

/// Errors raised while assembling a coordinator.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A required component was not supplied to the builder.
    #[error("coordinator is missing a {0}")]
    MissingComponent(&'static str),

    /// The policy store could not be opened.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The audit log could not be opened.
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// Configuration values could not be converted.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for runtime setup.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
