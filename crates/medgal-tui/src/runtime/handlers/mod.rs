//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return a `UiEvent`. The runtime
//! spawns them and forwards the result to the inbox; they never touch
//! state. Every API failure is already an `ApiError` by the time it leaves
//! a handler, so nothing here can reject past the reducer.

mod auth;
mod portal;

pub use auth::*;
pub use portal::*;
