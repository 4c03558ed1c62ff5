//! Tool call requests issued by the agent loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::SchemaError;
use crate::types::{Arguments, RequestId, Timestamp};

/// A single tool invocation requested by the caller.
///
/// Requests are immutable once created: fields are private and only exposed
/// through accessors. The builder-style `with_*` methods consume the request
/// and are meant for construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    id: RequestId,
    tool: String,
    arguments: Arguments,
    requested_at: Timestamp,
}

impl ToolCallRequest {
    /// Create a request for `tool` with the given arguments.
    #[must_use]
    pub fn new(tool: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            id: RequestId::new(),
            tool: tool.into(),
            arguments,
            requested_at: Timestamp::now(),
        }
    }

    /// Create a request from a JSON value, as produced by an LLM tool call.
    ///
    /// `null` is accepted as "no arguments".
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] if `arguments` is neither an
    /// object nor `null`.
    pub fn from_value(tool: impl Into<String>, arguments: Value) -> Result<Self, SchemaError> {
        let tool = tool.into();
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Arguments::new(),
            other => {
                return Err(SchemaError::NotAnObject {
                    context: format!("arguments for '{tool}'"),
                    found: json_type_name(&other).to_string(),
                });
            },
        };
        Ok(Self::new(tool, arguments))
    }

    /// Use a caller-supplied request ID (e.g. the LLM's tool-call ID mapped to a UUID).
    #[must_use]
    pub fn with_id(mut self, id: RequestId) -> Self {
        self.id = id;
        self
    }

    /// Override the request timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, requested_at: Timestamp) -> Self {
        self.requested_at = requested_at;
        self
    }

    /// The unique request identifier.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The tool identifier.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The arguments as supplied by the caller.
    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// When the request was created.
    #[must_use]
    pub fn requested_at(&self) -> Timestamp {
        self.requested_at
    }
}

impl fmt::Display for ToolCallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.tool)
    }
}

/// Name of a JSON value's type, as used in schema error messages.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
