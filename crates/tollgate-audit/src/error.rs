//! Audit-related error types.

use thiserror::Error;
use tollgate_core::RequestId;

/// Errors that can occur with audit logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// A record for this request was already appended.
    #[error("duplicate audit record for {request_id}")]
    DuplicateRecord {
        /// The request that already has a record.
        request_id: RequestId,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Chain integrity violation.
    #[error("chain integrity violation at entry {seq}: {reason}")]
    IntegrityViolation {
        /// The entry where violation was detected.
        seq: u64,
        /// Why the chain is invalid.
        reason: String,
    },
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
