//! The tool execution seam.

use async_trait::async_trait;
use serde_json::Value;
use tollgate_core::Arguments;

use crate::error::ToolExecutionError;

/// Runs a tool once permission has been granted.
///
/// The coordinator calls `execute` at most once per invocation and never
/// retries a failure.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run `tool` with the final, validated arguments.
    async fn execute(&self, tool: &str, arguments: Arguments) -> Result<Value, ToolExecutionError>;
}
