//! Clock-driven loading model.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// The two loading signals a listing view renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingState {
    /// A navigation has been requested and not yet resolved.
    pub is_pending: bool,
    /// The navigation has been pending longer than the skeleton delay.
    pub show_skeleton: bool,
}

/// Deterministic loading timer: callers supply the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingTimer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl LoadingTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// A navigation was requested. A request made while one is already
    /// pending keeps the original start.
    pub fn request(&mut self, now: Instant) {
        self.pending_since.get_or_insert(now);
    }

    /// The address bar changed, or the view went away.
    pub fn resolve(&mut self) {
        self.pending_since = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// When the skeleton will show if nothing resolves first.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending_since.map(|since| since + self.delay)
    }

    pub fn show_skeleton(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    pub fn state(&self, now: Instant) -> LoadingState {
        LoadingState {
            is_pending: self.is_pending(),
            show_skeleton: self.show_skeleton(now),
        }
    }
}
