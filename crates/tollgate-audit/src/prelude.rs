//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tollgate_audit::prelude::*;` to import all essential types.

pub use crate::{
    AuditEntry, AuditError, AuditFilter, AuditLog, AuditRecord, AuditResult, AuditStorage,
    ExecutionOutcome,
};
