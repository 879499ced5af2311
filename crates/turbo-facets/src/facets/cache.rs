//! Memoized facet computation.

use std::sync::Arc;

use crate::catalog::ListingSnapshot;
use crate::facets::{FacetEngine, FacetResult};
use crate::filter::{ActiveFilters, SearchHits};

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes the last `FacetResult` on `(snapshot identity, filters value,
/// search hits identity)`.
///
/// Only the latest entry is kept.
#[derive(Debug)]
pub struct FacetCache {
    snapshot: Arc<ListingSnapshot>,
    search: Option<Arc<SearchHits>>,
    last: Option<(ActiveFilters, Arc<FacetResult>)>,
    stats: CacheStats,
}

impl FacetCache {
    pub fn new(snapshot: Arc<ListingSnapshot>) -> Self {
        Self {
            snapshot,
            search: None,
            last: None,
            stats: CacheStats::default(),
        }
    }

    pub fn snapshot(&self) -> &Arc<ListingSnapshot> {
        &self.snapshot
    }

    /// Swap in a new snapshot. Identity, not content, decides invalidation.
    pub fn set_snapshot(&mut self, snapshot: Arc<ListingSnapshot>) {
        if !Arc::ptr_eq(&self.snapshot, &snapshot) {
            self.snapshot = snapshot;
            self.last = None;
        }
    }

    /// Swap in new search hits.
    pub fn set_search_hits(&mut self, hits: Option<Arc<SearchHits>>) {
        let same = match (&self.search, &hits) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.search = hits;
            self.last = None;
        }
    }

    /// Return the memoized result for `filters`, computing it on a miss.
    pub fn get(&mut self, filters: &ActiveFilters) -> Arc<FacetResult> {
        if let Some((cached_filters, result)) = &self.last {
            if cached_filters == filters {
                self.stats.hits += 1;
                return Arc::clone(result);
            }
        }

        self.stats.misses += 1;
        let result = Arc::new(
            FacetEngine::new(&self.snapshot)
                .with_search(self.search.as_deref())
                .compute(filters),
        );
        self.last = Some((filters.clone(), Arc::clone(&result)));
        result
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductFacetRecord;

    fn snapshot() -> Arc<ListingSnapshot> {
        Arc::new(ListingSnapshot::new(vec![
            ProductFacetRecord::new("p1").with_category("a").with_price(10),
            ProductFacetRecord::new("p2").with_category("b").with_price(20),
        ]))
    }

    #[test]
    fn test_equal_filters_hit() {
        let mut cache = FacetCache::new(snapshot());
        let filters = ActiveFilters::new().with_category(Some("a"));

        let first = cache.get(&filters);
        let second = cache.get(&filters.clone());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_changed_filters_miss() {
        let mut cache = FacetCache::new(snapshot());
        cache.get(&ActiveFilters::new());
        let result = cache.get(&ActiveFilters::new().with_price(15, None));
        assert_eq!(result.match_count, 1);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_new_snapshot_invalidates() {
        let mut cache = FacetCache::new(snapshot());
        let filters = ActiveFilters::new();
        cache.get(&filters);

        let same = Arc::clone(cache.snapshot());
        cache.set_snapshot(same);
        cache.get(&filters);
        assert_eq!(cache.stats().hits, 1);

        cache.set_snapshot(snapshot());
        cache.get(&filters);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_search_hits_invalidate() {
        let mut cache = FacetCache::new(snapshot());
        let filters = ActiveFilters::new().with_search("x");
        assert_eq!(cache.get(&filters).match_count, 2);

        cache.set_search_hits(Some(Arc::new(SearchHits::new(["p2".into()]))));
        assert_eq!(cache.get(&filters).match_count, 1);
    }
}
