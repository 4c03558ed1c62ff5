//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tollgate_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{ConfigurationError, SchemaError};

// Requests and decisions
pub use crate::{Arguments, PermissionDecision, RequestId, Timestamp, ToolCallRequest};

// Schemas
pub use crate::{FieldSpec, FieldType, SchemaRegistry, StaticSchemaRegistry, ToolSchema};

// Risk
pub use crate::{RiskAssessment, RiskLevel};
