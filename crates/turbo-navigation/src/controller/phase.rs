//! Controller phases and the navigation timeout policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the controller is in a navigation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterPhase {
    /// Displayed state equals committed state.
    #[default]
    Idle,
    /// The filter panel holds unsubmitted edits.
    DraftEditing,
    /// A navigation is in flight; the pending value is displayed.
    Optimistic,
    /// The address bar changed; overlays have been dropped.
    Settling,
}

impl FilterPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPhase::Idle => "idle",
            FilterPhase::DraftEditing => "draft_editing",
            FilterPhase::Optimistic => "optimistic",
            FilterPhase::Settling => "settling",
        }
    }

    /// Whether a navigation is awaiting the address bar.
    pub fn is_pending(&self) -> bool {
        matches!(self, FilterPhase::Optimistic)
    }
}

/// What to do when the address bar never reflects an issued navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "after", rename_all = "snake_case")]
pub enum NavigationTimeout {
    /// Stay optimistic until the address bar changes.
    #[default]
    Never,
    /// Drop the overlay once the navigation is this old.
    RollbackAfter(Duration),
}

impl NavigationTimeout {
    /// Whether a navigation issued `elapsed` ago should be abandoned.
    pub fn expired(&self, elapsed: Duration) -> bool {
        match self {
            NavigationTimeout::Never => false,
            NavigationTimeout::RollbackAfter(limit) => elapsed >= *limit,
        }
    }
}
