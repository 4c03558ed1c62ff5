//! Error types shared across Tollgate crates.

use thiserror::Error;

/// The system is not set up to handle a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No schema is registered for the tool.
    #[error("no schema registered for tool: {tool}")]
    UnknownTool {
        /// The unknown tool identifier
        tool: String,
    },
}

/// Errors raised while building or reading a tool schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A JSON value was expected to be an object.
    #[error("{context}: expected an object, found {found}")]
    NotAnObject {
        /// What was being parsed
        context: String,
        /// The JSON type actually found
        found: String,
    },

    /// A field declared a type Tollgate does not understand.
    #[error("field '{field}': unsupported type '{type_name}'")]
    UnsupportedType {
        /// The field name
        field: String,
        /// The declared type
        type_name: String,
    },

    /// `required` names a field that has no entry in `properties`.
    #[error("required field '{field}' is not declared in properties")]
    UndeclaredRequired {
        /// The field name
        field: String,
    },
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
