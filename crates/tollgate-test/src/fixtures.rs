//! Test fixtures for schemas, registries and requests.

use serde_json::Value;
use std::sync::Arc;
use std::sync::Once;

use tollgate_core::{
    Arguments, FieldSpec, FieldType, RiskLevel, StaticSchemaRegistry, ToolCallRequest, ToolSchema,
};

/// Convert a JSON object literal into [`Arguments`].
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
pub fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        other => panic!("test arguments must be a JSON object, got {other}"),
    }
}

/// Build a request for `tool` with JSON object arguments.
#[must_use]
pub fn test_request(tool: &str, arguments: Value) -> ToolCallRequest {
    ToolCallRequest::new(tool, args(arguments))
}

/// `send_email`: requires `to` and `subject`, optional `body`.
#[must_use]
pub fn send_email_schema() -> ToolSchema {
    ToolSchema::new("send_email")
        .with_description("Send an email on the user's behalf")
        .with_risk(RiskLevel::Medium)
        .with_field(
            "to",
            FieldSpec::required(FieldType::String).with_description("Recipient address"),
        )
        .with_field(
            "subject",
            FieldSpec::required(FieldType::String).with_description("Subject line"),
        )
        .with_field("body", FieldSpec::optional(FieldType::String))
}

/// `read_file`: requires `filepath`.
#[must_use]
pub fn read_file_schema() -> ToolSchema {
    ToolSchema::new("read_file")
        .with_description("Read a file from disk")
        .with_risk(RiskLevel::Low)
        .with_field("filepath", FieldSpec::required(FieldType::String))
}

/// `delete_file`: requires `filepath`, high risk.
#[must_use]
pub fn delete_file_schema() -> ToolSchema {
    ToolSchema::new("delete_file")
        .with_description("Delete a file from disk")
        .with_risk(RiskLevel::High)
        .with_field("filepath", FieldSpec::required(FieldType::String))
}

/// A registry holding `send_email`, `read_file` and `delete_file`.
#[must_use]
pub fn test_registry() -> Arc<StaticSchemaRegistry> {
    Arc::new(
        [send_email_schema(), read_file_schema(), delete_file_schema()]
            .into_iter()
            .collect(),
    )
}

static INIT_LOGGING: Once = Once::new();

/// Install a test subscriber once per process. Honors `RUST_LOG`.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
