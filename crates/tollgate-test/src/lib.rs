//! Tollgate Test - shared test utilities.
//!
//! Mock implementations of the capability traits the coordinator consumes,
//! plus schema and request fixtures. Use as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! tollgate-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use tollgate_test::{MockApprovalHandler, MockElicitationPresenter, MockExecutor, test_registry};
//!
//! let coordinator = InvocationCoordinator::builder()
//!     .registry(test_registry())
//!     .executor(MockExecutor::new().into_arc())
//!     .approval_handler(MockApprovalHandler::approving().into_arc())
//!     .elicitation_presenter(MockElicitationPresenter::cancelling().into_arc())
//!     .build()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
