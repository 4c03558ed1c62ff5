//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tollgate_policy::prelude::*;` to import all essential types.

pub use crate::{PolicyEntry, PolicyError, PolicyGuard, PolicyResult, PolicyStore};
