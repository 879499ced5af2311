//! Controller inputs and outputs.

use turbo_facets::codec::ListingState;
use turbo_facets::filter::ActiveFilters;
use turbo_facets::listing::SortOption;

/// An edit made in the Apply-gated filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Search(String),
    ToggleBrand(String),
    Brands(Vec<String>),
    /// Price bounds in minor units.
    Price { min: i64, max: Option<i64> },
    /// Select a dropdown value, or clear it with `None`.
    Custom { name: String, value: Option<String> },
    Range {
        name: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    Certified(bool),
}

impl DraftEdit {
    /// Apply the edit to panel filters.
    pub fn apply(&self, filters: &ActiveFilters) -> ActiveFilters {
        match self {
            DraftEdit::Search(text) => filters.with_search(text.clone()),
            DraftEdit::ToggleBrand(slug) => filters.toggle_brand(slug),
            DraftEdit::Brands(slugs) => filters.with_brands(slugs),
            DraftEdit::Price { min, max } => filters.with_price(*min, *max),
            DraftEdit::Custom { name, value: Some(value) } => filters.with_custom(name.clone(), value.clone()),
            DraftEdit::Custom { name, value: None } => filters.without_custom(name),
            DraftEdit::Range { name, min, max } => filters.with_range(name.clone(), *min, *max),
            DraftEdit::Certified(on) => filters.with_cpo(*on),
        }
    }
}

/// Everything that can happen to a listing view.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    /// Change a panel input without committing it.
    EditDraft(DraftEdit),
    /// Throw away unsubmitted panel edits.
    DiscardDraft,
    /// Commit the panel draft.
    Apply,
    /// Reset every filter except the category.
    ClearAll,
    /// Direct link to a category (or back to all categories).
    SelectCategory(Option<String>),
    /// Direct link to a page.
    SetPage(u32),
    /// Direct link to a sort order.
    SetSort(SortOption),
    /// Direct link to a complete filter set, e.g. removing one filter chip.
    ReplaceFilters(ActiveFilters),
    /// The address bar now decodes to this state.
    LocationChanged(ListingState),
    /// The view has re-rendered from committed state.
    Settled,
    /// Clock tick for the navigation timeout.
    Tick,
}

impl FilterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FilterEvent::EditDraft(_) => "edit_draft",
            FilterEvent::DiscardDraft => "discard_draft",
            FilterEvent::Apply => "apply",
            FilterEvent::ClearAll => "clear_all",
            FilterEvent::SelectCategory(_) => "select_category",
            FilterEvent::SetPage(_) => "set_page",
            FilterEvent::SetSort(_) => "set_sort",
            FilterEvent::ReplaceFilters(_) => "replace_filters",
            FilterEvent::LocationChanged(_) => "location_changed",
            FilterEvent::Settled => "settled",
            FilterEvent::Tick => "tick",
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Push this state to the address bar.
    Navigate(ListingState),
    /// The in-flight navigation was given up; stop any loading indicator.
    NavigationAbandoned,
}
