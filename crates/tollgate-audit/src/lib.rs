//! Tollgate Audit - the record of every mediated tool call.
//!
//! This crate provides:
//! - [`AuditRecord`]: request, arguments, decision, elicitation and outcome
//!   of one call
//! - [`AuditLog`]: append-only, one record per request ID, queryable by
//!   tool, time range and decision
//! - Chain-linked [`AuditEntry`] wrappers so edits to a persisted log are
//!   detected on open and by [`AuditLog::verify_chain`]
//! - [`MemoryAuditStorage`] and a JSON-lines [`FileAuditStorage`]
//!
//! # Example
//!
//! ```
//! use tollgate_audit::{AuditFilter, AuditLog, AuditRecord, ExecutionOutcome};
//! use tollgate_core::{Arguments, PermissionDecision, RequestId, Timestamp};
//!
//! let log = AuditLog::in_memory();
//! let now = Timestamp::now();
//! log.append(AuditRecord {
//!     request_id: RequestId::new(),
//!     tool: "delete_file".to_string(),
//!     arguments: Arguments::new(),
//!     decision: PermissionDecision::Denied,
//!     asked: false,
//!     elicitation: None,
//!     outcome: ExecutionOutcome::not_executed("denied by policy"),
//!     requested_at: now,
//!     decided_at: now,
//!     completed_at: now,
//! }).unwrap();
//!
//! let denied = log.query(&AuditFilter::all().decision(PermissionDecision::Denied));
//! assert_eq!(denied[0].outcome.to_string(), "not executed: denied by policy");
//! assert!(log.verify_chain().valid);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entry;
mod error;
mod filter;
mod log;
mod record;
mod storage;

pub use entry::{AuditEntry, ChainHash};
pub use error::{AuditError, AuditResult};
pub use filter::AuditFilter;
pub use log::{AuditLog, ChainIssue, ChainVerificationResult};
pub use record::{AuditRecord, ExecutionOutcome};
pub use storage::{AuditStorage, FileAuditStorage, MemoryAuditStorage};
