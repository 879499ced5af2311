//! Loading signals.
//!
//! `is_pending` flips as soon as a navigation is requested; `show_skeleton`
//! only once it has been pending for the configured delay.

mod driver;
mod model;

pub use driver::SkeletonTimer;
pub use model::{LoadingState, LoadingTimer};
