//! Tollgate Policy - remembered per-tool permission choices.
//!
//! The [`PolicyStore`] maps each tool identifier to at most one
//! [`PolicyEntry`]: `AlwaysAllow`, `AlwaysDeny` or `Ask`. A tool with no
//! entry is treated as `Ask`. Entries change only through an explicit
//! [`record`](PolicyStore::record), [`forget`](PolicyStore::forget) or
//! [`reset`](PolicyStore::reset).
//!
//! The decision engine holds a [`PolicyGuard`] for the whole
//! read-prompt-write sequence of one call, so two concurrent calls to the
//! same tool can never interleave their "remember my choice" updates. Calls
//! to different tools use different gates.
//!
//! A durable store keeps its entries in a JSON object keyed by tool name:
//!
//! ```json
//! { "read_file": "allow", "delete_file": "deny", "write_file": "ask" }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod entry;
/// Error types and results for the policy store.
pub mod error;
pub mod store;

pub use entry::PolicyEntry;
pub use error::{PolicyError, PolicyResult};
pub use store::{PolicyGuard, PolicyStore};
