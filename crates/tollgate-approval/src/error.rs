use tollgate_core::ConfigurationError;
use tollgate_elicitation::ValidationError;

/// Errors that stop the engine from reaching a decision.
///
/// Denials are not errors; they are returned as a [`Decision`](crate::Decision).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The tool is not known to the schema registry.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The user accepted an elicitation with invalid values.
    #[error("{error}")]
    Validation {
        /// What was wrong with the values.
        #[source]
        error: ValidationError,
        /// Whether the call had entered the `Asked` state.
        asked: bool,
    },
}

/// Result type for decisions.
pub type DecisionResult<T> = Result<T, DecisionError>;
