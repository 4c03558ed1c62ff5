use crate::types::ElicitationState;

/// An accepted elicitation payload did not satisfy the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid arguments for '{tool}': {}", .problems.join("; "))]
pub struct ValidationError {
    /// The tool whose arguments were rejected.
    pub tool: String,
    /// Each problem found, in field order.
    pub problems: Vec<String>,
}

/// Attempted to move an elicitation out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid elicitation transition: {from} -> {to}")]
pub struct InvalidTransition {
    /// The state the request was in.
    pub from: ElicitationState,
    /// The requested state.
    pub to: ElicitationState,
}
