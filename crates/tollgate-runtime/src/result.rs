//! The value returned for every invocation.

use serde_json::Value;
use tollgate_audit::AuditError;
use tollgate_core::{Arguments, PermissionDecision, RequestId};

use crate::error::InvocationError;

/// What happened to one tool call.
///
/// Exactly one is produced per [`invoke`](crate::InvocationCoordinator::invoke),
/// matching the single audit record written for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    /// The request this result answers.
    pub request_id: RequestId,
    /// `Allowed` or `Denied`.
    pub decision: PermissionDecision,
    /// Arguments the tool ran with, or would have run with.
    pub arguments: Arguments,
    /// The tool's value, or why there is none.
    pub outcome: Result<Value, InvocationError>,
    /// Set when the audit record could not be written.
    pub audit_error: Option<AuditError>,
}

impl ToolCallResult {
    /// Check whether the tool ran and succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Check whether the tool was started.
    #[must_use]
    pub fn was_executed(&self) -> bool {
        match &self.outcome {
            Ok(_) => true,
            Err(e) => !e.is_pre_execution(),
        }
    }

    /// The tool's value, if it succeeded.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    /// The error, if the call produced no value.
    #[must_use]
    pub fn error(&self) -> Option<&InvocationError> {
        self.outcome.as_ref().err()
    }
}
