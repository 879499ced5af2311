//! Facet computation output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed price bounds in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

/// Observed bounds of a continuous attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    pub min: f64,
    pub max: f64,
}

impl RangeBounds {
    pub(crate) fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub(crate) fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Facet counts for one `(snapshot, filters)` pair.
///
/// Each count relaxes only its own dimension. Maps are ordered so two
/// results computed from equal inputs compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FacetResult {
    /// Category slug to count, category relaxed.
    pub category_counts: BTreeMap<String, usize>,
    /// Brand slug to count, brand relaxed.
    pub brand_counts: BTreeMap<String, usize>,
    /// Price bounds, price relaxed.
    pub price_range: PriceRange,
    /// Records matching everything except the category.
    pub all_products_count: usize,
    /// Records matching every filter.
    pub match_count: usize,
    /// Dropdown attribute name to value counts, that attribute relaxed.
    pub attribute_counts: BTreeMap<String, BTreeMap<String, usize>>,
    /// Range attribute name to observed bounds, that range relaxed.
    pub range_bounds: BTreeMap<String, RangeBounds>,
}

impl FacetResult {
    pub fn category_count(&self, slug: &str) -> usize {
        self.category_counts.get(slug).copied().unwrap_or(0)
    }

    pub fn brand_count(&self, slug: &str) -> usize {
        self.brand_counts.get(slug).copied().unwrap_or(0)
    }

    pub fn attribute_count(&self, name: &str, value: &str) -> usize {
        self.attribute_counts
            .get(name)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the listing should render its empty state.
    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }
}
