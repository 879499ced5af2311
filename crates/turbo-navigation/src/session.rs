//! A listing view wired end to end.
//!
//! `ListingSession` owns the codec, the controller, the facet cache and the
//! skeleton timer for one mounted listing. UI events go in through
//! `dispatch`; locations to push come out. Address-bar changes come back in
//! through `location_changed`.

use std::sync::Arc;

use tokio::sync::watch;
use turbo_facets::catalog::ListingSnapshot;
use turbo_facets::codec::{CodecConfig, Location, QueryCodec};
use turbo_facets::facets::{CacheStats, FacetCache, FacetResult};
use turbo_facets::filter::{ActiveFilters, SearchHits};
use turbo_facets::listing::ListingQuery;

use crate::config::NavigationConfig;
use crate::controller::{Effect, FilterController, FilterEvent, FilterPhase};
use crate::error::NavigationError;
use crate::loading::{LoadingState, SkeletonTimer};

/// One mounted listing view. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ListingSession {
    codec: QueryCodec,
    controller: FilterController,
    cache: FacetCache,
    search: Option<Arc<SearchHits>>,
    timer: SkeletonTimer,
}

impl ListingSession {
    /// Start a session at `location`.
    pub fn new(
        snapshot: Arc<ListingSnapshot>,
        codec_config: CodecConfig,
        config: &NavigationConfig,
        location: &Location,
    ) -> Result<Self, NavigationError> {
        codec_config.validate()?;
        config.validate()?;

        let codec = QueryCodec::for_snapshot(codec_config, &snapshot);
        let committed = codec.decode(location);
        let controller = FilterController::new(committed).with_timeout(config.timeout());
        let timer = SkeletonTimer::new(config.skeleton_delay())?;

        tracing::debug!(location = %location, products = snapshot.len(), "listing session started");

        Ok(Self {
            codec,
            controller,
            cache: FacetCache::new(snapshot),
            search: None,
            timer,
        })
    }

    pub fn codec(&self) -> &QueryCodec {
        &self.codec
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    pub fn phase(&self) -> FilterPhase {
        self.controller.phase()
    }

    pub fn snapshot(&self) -> &Arc<ListingSnapshot> {
        self.cache.snapshot()
    }

    /// Filters the listing and facet counts reflect right now.
    pub fn displayed_filters(&self) -> &ActiveFilters {
        self.controller.displayed_filters()
    }

    /// Filters the panel inputs show.
    pub fn panel_filters(&self) -> &ActiveFilters {
        self.controller.panel_filters()
    }

    /// Apply a UI event; returns the locations to push to the address bar.
    pub fn dispatch(&mut self, event: FilterEvent) -> Vec<Location> {
        let resolves = matches!(event, FilterEvent::LocationChanged(_));
        let now = tokio::time::Instant::now().into_std();

        let (next, effects) = self.controller.transition(event, now);
        self.controller = next;

        let mut navigations = Vec::new();
        for effect in effects {
            match effect {
                Effect::Navigate(state) => {
                    let location = self.codec.encode(&state);
                    tracing::debug!(location = %location, "navigation issued");
                    self.timer.start();
                    navigations.push(location);
                }
                Effect::NavigationAbandoned => self.timer.resolve(),
            }
        }

        if resolves {
            self.timer.resolve();
        }
        navigations
    }

    /// The address bar changed to `location`.
    pub fn location_changed(&mut self, location: &Location) {
        let state = self.codec.decode(location);
        tracing::debug!(location = %location, "address bar changed");
        self.dispatch(FilterEvent::LocationChanged(state));
    }

    /// The view re-rendered from committed state.
    pub fn settled(&mut self) {
        self.dispatch(FilterEvent::Settled);
    }

    /// Check the navigation timeout.
    pub fn tick(&mut self) {
        self.dispatch(FilterEvent::Tick);
    }

    /// Facet counts for the displayed filters.
    pub fn facets(&mut self) -> Arc<FacetResult> {
        self.cache.get(self.controller.displayed_filters())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Listing query for the displayed state.
    pub fn listing_query(&self) -> ListingQuery {
        self.controller
            .displayed()
            .to_query(self.search.as_deref(), self.codec.config().per_page)
    }

    pub fn loading(&self) -> LoadingState {
        self.timer.state()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingState> {
        self.timer.subscribe()
    }

    /// Replace the snapshot, e.g. after the upstream collaborator refreshed.
    pub fn set_snapshot(&mut self, snapshot: Arc<ListingSnapshot>) {
        self.codec = QueryCodec::for_snapshot(self.codec.config().clone(), &snapshot);
        self.cache.set_snapshot(snapshot);
    }

    /// Replace the scorer output for the current search text.
    pub fn set_search_hits(&mut self, hits: Option<Arc<SearchHits>>) {
        self.search = hits.clone();
        self.cache.set_search_hits(hits);
    }
}
