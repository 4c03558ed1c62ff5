//! Tollgate Runtime - the invocation coordinator.
//!
//! This crate ties the permission decision engine, the tool executor and
//! the audit log together. [`InvocationCoordinator::invoke`] takes one
//! tool call request and always returns one [`ToolCallResult`], leaving
//! exactly one audit record behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use tollgate_core::{StaticSchemaRegistry, ToolCallRequest};
//! use tollgate_runtime::InvocationCoordinator;
//! # use tollgate_runtime::{ToolExecutor, ToolExecutionError};
//! # use tollgate_approval::{ApprovalHandler, ApprovalRequest, ApprovalResponse};
//! # use tollgate_elicitation::{ElicitationPresenter, ElicitationRequest, ElicitationOutcome};
//! # struct Tools;
//! # #[async_trait::async_trait]
//! # impl ToolExecutor for Tools {
//! #     async fn execute(&self, _: &str, _: tollgate_core::Arguments) -> Result<serde_json::Value, ToolExecutionError> { Ok(serde_json::Value::Null) }
//! # }
//! # struct Prompt;
//! # #[async_trait::async_trait]
//! # impl ApprovalHandler for Prompt {
//! #     async fn request_approval(&self, _: ApprovalRequest) -> Option<ApprovalResponse> { None }
//! # }
//! # #[async_trait::async_trait]
//! # impl ElicitationPresenter for Prompt {
//! #     async fn present(&self, _: ElicitationRequest) -> ElicitationOutcome { ElicitationOutcome::Cancel }
//! # }
//!
//! # async fn example() -> Result<(), tollgate_runtime::RuntimeError> {
//! let coordinator = InvocationCoordinator::builder()
//!     .registry(Arc::new(StaticSchemaRegistry::new()))
//!     .executor(Arc::new(Tools))
//!     .approval_handler(Arc::new(Prompt))
//!     .elicitation_presenter(Arc::new(Prompt))
//!     .build()?;
//!
//! let request = ToolCallRequest::new("read_file", serde_json::Map::new());
//! let result = coordinator.invoke(request, &CancellationToken::new()).await;
//! assert_eq!(coordinator.audit().len(), 1);
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config_bridge;
pub mod prelude;

mod builder;
mod coordinator;
mod error;
mod executor;
mod result;

pub use builder::CoordinatorBuilder;
pub use coordinator::InvocationCoordinator;
pub use error::{InvocationError, RuntimeError, RuntimeResult, ToolExecutionError};
pub use executor::ToolExecutor;
pub use result::ToolCallResult;
