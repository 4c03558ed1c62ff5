//! Prelude module - commonly used test utilities.
//!
//! Use `use tollgate_test::prelude::*;` to import all essential types.

pub use crate::fixtures::{
    args, init_test_logging, read_file_schema, send_email_schema, test_registry, test_request,
};
pub use crate::mocks::{MockApprovalHandler, MockElicitationPresenter, MockExecutor};
