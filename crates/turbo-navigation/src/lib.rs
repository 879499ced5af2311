//! Optimistic navigation for TurboCommerce listing pages.
//!
//! This crate provides the stateful half of a listing page on top of
//! `turbo-facets`:
//!
//! - **Controller**: Committed state, panel draft and optimistic overlay as a pure state machine
//! - **Loading**: `is_pending` / `show_skeleton` signals, as a clock-driven model and a tokio driver
//! - **Session**: Codec, controller, facet cache and timer wired together
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use turbo_facets::codec::ListingState;
//! use turbo_navigation::prelude::*;
//!
//! let controller = FilterController::new(ListingState::default());
//! let (next, effects) =
//!     controller.transition(FilterEvent::SelectCategory(Some("cars".into())), Instant::now());
//!
//! assert_eq!(next.phase(), FilterPhase::Optimistic);
//! assert_eq!(next.displayed_filters().category.as_deref(), Some("cars"));
//! assert_eq!(effects.len(), 1);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod loading;
pub mod session;

pub use config::NavigationConfig;
pub use error::NavigationError;
pub use session::ListingSession;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::NavigationConfig;
    pub use crate::controller::{
        transition, DraftEdit, Effect, FilterController, FilterEvent, FilterPhase,
        NavigationTimeout,
    };
    pub use crate::error::NavigationError;
    pub use crate::loading::{LoadingState, LoadingTimer, SkeletonTimer};
    pub use crate::session::ListingSession;
}
