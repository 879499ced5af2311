//! Optimistic filter controller.
//!
//! The controller is an immutable value. Every event produces a new value
//! plus the effects the caller must carry out, so the whole transition
//! table can be exercised without a browser, a router or a clock.

use std::time::Instant;

use turbo_facets::codec::ListingState;
use turbo_facets::filter::ActiveFilters;

use crate::controller::{Effect, FilterEvent, FilterPhase, NavigationTimeout};

/// Committed state, panel draft and optimistic overlay for one listing view.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterController {
    phase: FilterPhase,
    /// Last state decoded from the address bar.
    committed: ListingState,
    /// Unsubmitted panel edits.
    draft: Option<ActiveFilters>,
    /// Target of the in-flight navigation.
    pending: Option<ListingState>,
    issued_at: Option<Instant>,
    timeout: NavigationTimeout,
}

impl FilterController {
    pub fn new(committed: ListingState) -> Self {
        Self {
            phase: FilterPhase::Idle,
            committed,
            draft: None,
            pending: None,
            issued_at: None,
            timeout: NavigationTimeout::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: NavigationTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    pub fn committed(&self) -> &ListingState {
        &self.committed
    }

    pub fn pending(&self) -> Option<&ListingState> {
        self.pending.as_ref()
    }

    pub fn draft(&self) -> Option<&ActiveFilters> {
        self.draft.as_ref()
    }

    pub fn timeout(&self) -> NavigationTimeout {
        self.timeout
    }

    /// What the listing shows: the pending value while a navigation is in
    /// flight, otherwise the committed one.
    pub fn displayed(&self) -> &ListingState {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    /// Filters used for facet counts.
    pub fn displayed_filters(&self) -> &ActiveFilters {
        &self.displayed().filters
    }

    /// Filters shown in the panel inputs: the draft when there is one.
    pub fn panel_filters(&self) -> &ActiveFilters {
        self.draft.as_ref().unwrap_or_else(|| self.displayed_filters())
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// Apply one event at time `now`.
    pub fn transition(&self, event: FilterEvent, now: Instant) -> (Self, Vec<Effect>) {
        let name = event.name();
        let (next, effects) = self.step(event, now);
        if next.phase != self.phase || !effects.is_empty() {
            tracing::debug!(
                event = name,
                from = self.phase.as_str(),
                to = next.phase.as_str(),
                effects = effects.len(),
                "filter transition"
            );
        }
        (next, effects)
    }

    fn step(&self, event: FilterEvent, now: Instant) -> (Self, Vec<Effect>) {
        match event {
            FilterEvent::EditDraft(edit) => {
                let edited = edit.apply(self.panel_filters());
                let draft = (&edited != self.displayed_filters()).then_some(edited);
                (self.with_draft(draft), vec![])
            }
            FilterEvent::DiscardDraft => (self.with_draft(None), vec![]),
            FilterEvent::Apply => match &self.draft {
                Some(draft) => {
                    let target = ListingState {
                        filters: draft.clone(),
                        page: 1,
                        sort: self.displayed().sort,
                    };
                    self.issue(target, now)
                }
                None => (self.clone(), vec![]),
            },
            FilterEvent::ClearAll => {
                let target = ListingState {
                    filters: self.displayed_filters().cleared(),
                    page: 1,
                    sort: self.displayed().sort,
                };
                self.issue(target, now)
            }
            FilterEvent::SelectCategory(category) => {
                let target = ListingState {
                    filters: self.displayed_filters().with_category(category.as_deref()),
                    page: 1,
                    sort: self.displayed().sort,
                };
                self.issue(target, now)
            }
            FilterEvent::SetPage(page) => {
                let target = self.displayed().clone().with_page(page);
                self.issue(target, now)
            }
            FilterEvent::SetSort(sort) => {
                let target = self.displayed().clone().with_sort(sort).with_page(1);
                self.issue(target, now)
            }
            FilterEvent::ReplaceFilters(filters) => {
                let target = ListingState {
                    filters,
                    page: 1,
                    sort: self.displayed().sort,
                };
                self.issue(target, now)
            }
            FilterEvent::LocationChanged(state) => {
                if self.pending.is_none() && self.draft.is_none() && state == self.committed {
                    return (self.clone(), vec![]);
                }
                let next = Self {
                    phase: FilterPhase::Settling,
                    committed: state,
                    draft: None,
                    pending: None,
                    issued_at: None,
                    timeout: self.timeout,
                };
                (next, vec![])
            }
            FilterEvent::Settled => {
                let mut next = self.clone();
                if next.phase == FilterPhase::Settling {
                    next.phase = FilterPhase::Idle;
                }
                (next, vec![])
            }
            FilterEvent::Tick => {
                let expired = match (self.phase, self.issued_at) {
                    (FilterPhase::Optimistic, Some(issued)) => {
                        self.timeout.expired(now.saturating_duration_since(issued))
                    }
                    _ => false,
                };
                if !expired {
                    return (self.clone(), vec![]);
                }
                tracing::warn!(
                    target_state = ?self.pending,
                    "navigation never reached the address bar, rolling back"
                );
                let mut next = Self {
                    pending: None,
                    issued_at: None,
                    ..self.clone()
                };
                next.phase = next.resting_phase();
                (next, vec![Effect::NavigationAbandoned])
            }
        }
    }

    /// Start (or supersede) a navigation to `target`.
    fn issue(&self, target: ListingState, now: Instant) -> (Self, Vec<Effect>) {
        // The address bar already shows the target and nothing is in
        // flight that could move it, so there is nothing to wait for.
        if target == self.committed && self.pending.is_none() {
            let next = Self {
                phase: FilterPhase::Idle,
                draft: None,
                ..self.clone()
            };
            return (next, vec![]);
        }

        let next = Self {
            phase: FilterPhase::Optimistic,
            committed: self.committed.clone(),
            draft: None,
            pending: Some(target.clone()),
            issued_at: Some(now),
            timeout: self.timeout,
        };
        (next, vec![Effect::Navigate(target)])
    }

    fn with_draft(&self, draft: Option<ActiveFilters>) -> Self {
        let mut next = Self {
            draft,
            ..self.clone()
        };
        if next.phase != FilterPhase::Optimistic {
            next.phase = next.resting_phase();
        }
        next
    }

    /// Phase when no navigation is in flight.
    fn resting_phase(&self) -> FilterPhase {
        if self.draft.is_some() {
            FilterPhase::DraftEditing
        } else {
            FilterPhase::Idle
        }
    }
}

/// Pure transition function over controller values.
pub fn transition(
    state: &FilterController,
    event: FilterEvent,
    now: Instant,
) -> (FilterController, Vec<Effect>) {
    state.transition(event, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DraftEdit;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use turbo_facets::listing::SortOption;

    fn committed() -> ListingState {
        ListingState::new(ActiveFilters::new().with_category(Some("cars")))
    }

    fn run(controller: &FilterController, events: Vec<FilterEvent>) -> (FilterController, Vec<Effect>) {
        let now = Instant::now();
        let mut current = controller.clone();
        let mut all = Vec::new();
        for event in events {
            let (next, effects) = current.transition(event, now);
            current = next;
            all.extend(effects);
        }
        (current, all)
    }

    #[test]
    fn test_select_category_is_displayed_immediately() {
        let controller = FilterController::new(committed());
        let (next, effects) = controller.transition(
            FilterEvent::SelectCategory(Some("trucks".into())),
            Instant::now(),
        );

        assert_eq!(next.phase(), FilterPhase::Optimistic);
        assert_eq!(next.displayed_filters().category.as_deref(), Some("trucks"));
        assert_eq!(next.committed().filters.category.as_deref(), Some("cars"));
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Navigate(s) if s.filters.category.as_deref() == Some("trucks")));
    }

    #[test]
    fn test_draft_does_not_touch_displayed_filters() {
        let controller = FilterController::new(committed());
        let (next, effects) = run(
            &controller,
            vec![
                FilterEvent::EditDraft(DraftEdit::ToggleBrand("volvo".into())),
                FilterEvent::EditDraft(DraftEdit::Price { min: 100, max: Some(900) }),
            ],
        );

        assert!(effects.is_empty());
        assert_eq!(next.phase(), FilterPhase::DraftEditing);
        assert!(next.displayed_filters().brands.is_empty());
        assert_eq!(next.panel_filters().brands, vec!["volvo"]);
        assert_eq!(next.panel_filters().max_price, Some(900));
    }

    #[test]
    fn test_edit_back_to_displayed_drops_draft() {
        let controller = FilterController::new(committed());
        let (next, _) = run(
            &controller,
            vec![
                FilterEvent::EditDraft(DraftEdit::ToggleBrand("volvo".into())),
                FilterEvent::EditDraft(DraftEdit::ToggleBrand("volvo".into())),
            ],
        );
        assert!(!next.has_draft());
        assert_eq!(next.phase(), FilterPhase::Idle);
    }

    #[test]
    fn test_apply_moves_draft_to_pending() {
        let start = FilterController::new(committed().with_page(3));
        let (next, effects) = run(
            &start,
            vec![
                FilterEvent::EditDraft(DraftEdit::Certified(true)),
                FilterEvent::Apply,
            ],
        );

        assert_eq!(next.phase(), FilterPhase::Optimistic);
        assert!(!next.has_draft());
        assert!(next.displayed_filters().is_cpo);
        assert_eq!(next.displayed().page, 1);
        assert_eq!(effects, vec![Effect::Navigate(next.displayed().clone())]);
    }

    #[test]
    fn test_apply_without_draft_is_noop() {
        let start = FilterController::new(committed());
        let (next, effects) = start.transition(FilterEvent::Apply, Instant::now());
        assert_eq!(next, start);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_clear_all_keeps_category() {
        let filters = ActiveFilters::new()
            .with_category(Some("cars"))
            .with_brands(["volvo"])
            .with_cpo(true);
        let start = FilterController::new(ListingState::new(filters));
        let (next, effects) = start.transition(FilterEvent::ClearAll, Instant::now());

        assert_eq!(next.phase(), FilterPhase::Optimistic);
        assert_eq!(next.displayed_filters(), &ActiveFilters::new().with_category(Some("cars")));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_navigation_to_committed_state_is_skipped() {
        let start = FilterController::new(committed());
        let (next, effects) =
            start.transition(FilterEvent::SelectCategory(Some("cars".into())), Instant::now());
        assert_eq!(next.phase(), FilterPhase::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reentrant_actions_last_write_wins() {
        let start = FilterController::new(committed());
        let (next, effects) = run(
            &start,
            vec![
                FilterEvent::SelectCategory(Some("trucks".into())),
                FilterEvent::SetSort(SortOption::PriceAsc),
                FilterEvent::SelectCategory(Some("vans".into())),
            ],
        );

        assert_eq!(effects.len(), 3);
        assert_eq!(next.displayed_filters().category.as_deref(), Some("vans"));
        assert_eq!(next.displayed().sort, SortOption::PriceAsc);

        // Going back to the committed state while a navigation is in
        // flight still has to navigate.
        let (trucks, _) =
            start.transition(FilterEvent::SelectCategory(Some("trucks".into())), Instant::now());
        let (back, effects) =
            trucks.transition(FilterEvent::SelectCategory(Some("cars".into())), Instant::now());
        assert_eq!(back.phase(), FilterPhase::Optimistic);
        assert_eq!(back.displayed(), &committed());
        assert_eq!(effects, vec![Effect::Navigate(committed())]);
    }

    #[test]
    fn test_location_change_settles_then_idles() {
        let start = FilterController::new(committed());
        let (optimistic, _) = start.transition(FilterEvent::SetPage(2), Instant::now());
        let landed = optimistic.displayed().clone();

        let (settling, _) = optimistic.transition(FilterEvent::LocationChanged(landed.clone()), Instant::now());
        assert_eq!(settling.phase(), FilterPhase::Settling);
        assert_eq!(settling.committed(), &landed);
        assert_eq!(settling.pending(), None);

        let (idle, _) = settling.transition(FilterEvent::Settled, Instant::now());
        assert_eq!(idle.phase(), FilterPhase::Idle);
        assert_eq!(idle.displayed(), &landed);
    }

    #[test]
    fn test_location_change_clears_draft() {
        let start = FilterController::new(committed());
        let (drafting, _) = start.transition(
            FilterEvent::EditDraft(DraftEdit::Search("wagon".into())),
            Instant::now(),
        );
        let external = ListingState::new(ActiveFilters::new().with_category(Some("boats")));
        let (settling, _) = drafting.transition(FilterEvent::LocationChanged(external), Instant::now());

        assert_eq!(settling.phase(), FilterPhase::Settling);
        assert!(!settling.has_draft());
        assert_eq!(settling.panel_filters().category.as_deref(), Some("boats"));
    }

    #[test]
    fn test_unchanged_location_is_ignored() {
        let start = FilterController::new(committed());
        let (next, _) = start.transition(FilterEvent::LocationChanged(committed()), Instant::now());
        assert_eq!(next.phase(), FilterPhase::Idle);
    }

    #[test]
    fn test_never_timeout_stays_optimistic() {
        let issued = Instant::now();
        let start = FilterController::new(committed());
        let (optimistic, _) = start.transition(FilterEvent::SetPage(2), issued);

        let (still, effects) = optimistic.transition(FilterEvent::Tick, issued + Duration::from_secs(3600));
        assert_eq!(still.phase(), FilterPhase::Optimistic);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_rollback_after_timeout() {
        let issued = Instant::now();
        let start = FilterController::new(committed())
            .with_timeout(NavigationTimeout::RollbackAfter(Duration::from_secs(5)));
        let (optimistic, _) = start.transition(FilterEvent::SetPage(2), issued);

        let (early, effects) = optimistic.transition(FilterEvent::Tick, issued + Duration::from_secs(4));
        assert_eq!(early.phase(), FilterPhase::Optimistic);
        assert!(effects.is_empty());

        // Edits made while waiting survive the rollback.
        let (edited, _) = early.transition(
            FilterEvent::EditDraft(DraftEdit::ToggleBrand("volvo".into())),
            issued + Duration::from_secs(4),
        );
        assert_eq!(edited.phase(), FilterPhase::Optimistic);

        let (rolled_back, effects) = edited.transition(FilterEvent::Tick, issued + Duration::from_secs(5));
        assert_eq!(effects, vec![Effect::NavigationAbandoned]);
        assert_eq!(rolled_back.phase(), FilterPhase::DraftEditing);
        assert_eq!(rolled_back.displayed(), &committed());
        assert_eq!(rolled_back.panel_filters().brands, vec!["volvo"]);
    }

    #[test]
    fn test_free_function_matches_method() {
        let start = FilterController::new(committed());
        let now = Instant::now();
        let event = FilterEvent::SelectCategory(None);
        assert_eq!(transition(&start, event.clone(), now), start.transition(event, now));
    }
}
