//! Tollgate Core - Foundation types shared by every Tollgate crate.
//!
//! This crate provides:
//! - [`ToolCallRequest`], the immutable description of one tool invocation
//! - [`PermissionDecision`], the `Allowed`/`Denied`/`Asked` decision matrix
//! - [`ToolSchema`] and [`FieldSpec`], the argument schema used for
//!   completeness checks and elicitation
//! - [`SchemaRegistry`], the lookup capability for tool schemas
//! - [`RiskLevel`] and [`RiskAssessment`] shown alongside approval prompts
//!
//! # Example
//!
//! ```
//! use tollgate_core::{FieldSpec, FieldType, ToolCallRequest, ToolSchema};
//! use serde_json::json;
//!
//! let schema = ToolSchema::new("send_email")
//!     .with_field("to", FieldSpec::required(FieldType::String))
//!     .with_field("subject", FieldSpec::required(FieldType::String));
//!
//! let request = ToolCallRequest::from_value("send_email", json!({"to": "x@y.com"})).unwrap();
//! assert_eq!(schema.missing_fields(request.arguments()), vec!["subject".to_string()]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod decision;
pub mod error;
pub mod registry;
pub mod request;
pub mod risk;
pub mod schema;
pub mod types;

pub use decision::PermissionDecision;
pub use error::{ConfigurationError, SchemaError};
pub use registry::{SchemaRegistry, StaticSchemaRegistry};
pub use request::ToolCallRequest;
pub use risk::{RiskAssessment, RiskLevel};
pub use schema::{FieldSpec, FieldType, ToolSchema};
pub use types::{Arguments, RequestId, Timestamp};
