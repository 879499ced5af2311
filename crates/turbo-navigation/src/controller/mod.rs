//! Optimistic filter controller.
//!
//! Contains the controller phases, the events it consumes, the effects it
//! requests, and the pure transition function.

mod event;
mod machine;
mod phase;

pub use event::{DraftEdit, Effect, FilterEvent};
pub use machine::{transition, FilterController};
pub use phase::{FilterPhase, NavigationTimeout};
