//! Tollgate Elicitation - asking the user for missing tool arguments.
//!
//! When a tool call arrives without all of its required arguments, the
//! [`ElicitationEngine`] asks the user for exactly the missing fields through
//! an [`ElicitationPresenter`], validates the answer, and returns the merged
//! arguments. The user may also decline or cancel; both are terminal.
//!
//! # Example
//!
//! ```
//! use tollgate_elicitation::{ElicitationOutcome, ElicitationState};
//!
//! let outcome = ElicitationOutcome::Decline;
//! assert_eq!(outcome.state(), ElicitationState::Declined);
//! assert!(ElicitationState::Declined.advance(ElicitationState::Accepted).is_err());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod engine;
/// Error types for elicitation.
pub mod error;
pub mod types;

pub use engine::{ElicitationEngine, ElicitationPresenter};
pub use error::{InvalidTransition, ValidationError};
pub use types::{ElicitationId, ElicitationOutcome, ElicitationRequest, ElicitationState};
