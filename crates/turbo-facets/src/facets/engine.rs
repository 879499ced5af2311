//! Facet count engine.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::catalog::ListingSnapshot;
use crate::facets::{FacetResult, PriceRange, RangeBounds};
use crate::filter::{ActiveFilters, Dimension, FilterExpr, SearchHits};

/// Computes "what if this filter were lifted" counts over a snapshot.
///
/// Each facet is one linear pass over the records with that facet's own
/// dimension relaxed. No I/O; safe to call on every render.
#[derive(Debug, Clone, Copy)]
pub struct FacetEngine<'a> {
    snapshot: &'a ListingSnapshot,
    search: Option<&'a SearchHits>,
}

impl<'a> FacetEngine<'a> {
    pub fn new(snapshot: &'a ListingSnapshot) -> Self {
        Self {
            snapshot,
            search: None,
        }
    }

    /// Constrain counts to the scorer's hits for the current search text.
    pub fn with_search(mut self, hits: Option<&'a SearchHits>) -> Self {
        self.search = hits;
        self
    }

    /// Compute every facet for the given filters.
    pub fn compute(&self, filters: &ActiveFilters) -> FacetResult {
        let started = Instant::now();
        let expr = FilterExpr::from_filters(filters, self.search);

        let (category_counts, all_products_count) = self.count_categories(&expr);
        let brand_counts = self.count_brands(&expr);
        let price_range = self.price_range(&expr);
        let match_count = self.count_matching(&expr);

        let attribute_counts = self
            .snapshot
            .attribute_names()
            .into_iter()
            .map(|name| (name.to_string(), self.count_attribute(&expr, name)))
            .collect();

        let range_bounds = self
            .snapshot
            .range_attribute_names()
            .into_iter()
            .filter_map(|name| self.range_bounds(&expr, name).map(|b| (name.to_string(), b)))
            .collect();

        tracing::trace!(
            records = self.snapshot.len(),
            clauses = expr.clauses().len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "facet counts computed"
        );

        FacetResult {
            category_counts,
            brand_counts,
            price_range,
            all_products_count,
            match_count,
            attribute_counts,
            range_bounds,
        }
    }

    /// Category pass. Also yields the category-relaxed total.
    fn count_categories(&self, expr: &FilterExpr) -> (BTreeMap<String, usize>, usize) {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total = 0;
        for record in &self.snapshot.records {
            if !expr.matches_relaxing(record, Some(&Dimension::Category)) {
                continue;
            }
            total += 1;
            for category in record.distinct_categories() {
                *counts.entry(category.to_string()).or_insert(0) += 1;
            }
        }
        (counts, total)
    }

    fn count_brands(&self, expr: &FilterExpr) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in &self.snapshot.records {
            let Some(brand) = &record.brand else { continue };
            if expr.matches_relaxing(record, Some(&Dimension::Brand)) {
                *counts.entry(brand.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Price pass. Falls back to `[0, ceiling]` when nothing matches.
    fn price_range(&self, expr: &FilterExpr) -> PriceRange {
        let mut bounds: Option<PriceRange> = None;
        for record in &self.snapshot.records {
            let Some(price) = record.price else { continue };
            if !expr.matches_relaxing(record, Some(&Dimension::Price)) {
                continue;
            }
            bounds = Some(match bounds {
                None => PriceRange {
                    min: price,
                    max: price,
                },
                Some(b) => PriceRange {
                    min: b.min.min(price),
                    max: b.max.max(price),
                },
            });
        }
        bounds.unwrap_or(PriceRange {
            min: 0,
            max: self.snapshot.effective_price_ceiling(),
        })
    }

    fn count_matching(&self, expr: &FilterExpr) -> usize {
        self.snapshot
            .records
            .iter()
            .filter(|record| expr.matches(record))
            .count()
    }

    fn count_attribute(&self, expr: &FilterExpr, name: &str) -> BTreeMap<String, usize> {
        let relax = Dimension::Attribute(name.to_string());
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in &self.snapshot.records {
            if !expr.matches_relaxing(record, Some(&relax)) {
                continue;
            }
            for value in record.attribute_values(name) {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn range_bounds(&self, expr: &FilterExpr, name: &str) -> Option<RangeBounds> {
        let relax = Dimension::Range(name.to_string());
        let mut bounds: Option<RangeBounds> = None;
        for record in &self.snapshot.records {
            if !expr.matches_relaxing(record, Some(&relax)) {
                continue;
            }
            for value in record.numeric_values(name) {
                match bounds.as_mut() {
                    Some(b) => b.include(value),
                    None => bounds = Some(RangeBounds::point(value)),
                }
            }
        }
        bounds
    }
}

/// Compute facets for a snapshot without search hits.
pub fn compute(snapshot: &ListingSnapshot, filters: &ActiveFilters) -> FacetResult {
    FacetEngine::new(snapshot).compute(filters)
}
