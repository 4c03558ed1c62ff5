//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tollgate_elicitation::prelude::*;` to import all essential types.

pub use crate::{
    ElicitationEngine, ElicitationOutcome, ElicitationPresenter, ElicitationRequest,
    ElicitationState, ValidationError,
};
