//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tollgate_approval::prelude::*;` to import all essential types.

pub use crate::{
    ApprovalDecision, ApprovalHandler, ApprovalRequest, ApprovalResponse, Decision,
    DecisionEngine, DecisionError, DenialReason,
};
