//! Tollgate Approval - the permission decision engine.
//!
//! Every tool call is classified as allowed, denied, or deferred to the user.
//! The [`DecisionEngine`] combines the remembered per-tool policy, argument
//! elicitation and the interactive [`ApprovalHandler`] into one final
//! [`Decision`]. A deferred ("asked") call is always resolved to allowed or
//! denied before `decide` returns.
//!
//! # Example
//!
//! ```
//! use tollgate_approval::{ApprovalResponse, DenialReason};
//!
//! let always = ApprovalResponse::approve_always();
//! assert!(always.remember);
//! assert!(always.decision.is_approved());
//!
//! assert_eq!(DenialReason::Cancelled.to_string(), "cancelled");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod decision;
pub mod engine;
/// Error types and results for the decision engine.
pub mod error;
pub mod request;

pub use decision::{Decision, DenialReason};
pub use engine::{ApprovalHandler, DecisionEngine};
pub use error::{DecisionError, DecisionResult};
pub use request::{ApprovalDecision, ApprovalRequest, ApprovalResponse};
