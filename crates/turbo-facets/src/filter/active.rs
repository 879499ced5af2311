//! The canonical active filter state.

use crate::catalog::{canonical_brand, canonical_category};
use serde::{Deserialize, Serialize};

/// A selected dropdown attribute value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomFilter {
    /// Attribute display name.
    pub name: String,
    /// Selected value.
    pub value: String,
}

/// A numeric range constraint on a continuous attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeFilter {
    /// Attribute display name.
    pub name: String,
    /// Inclusive lower bound.
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default)]
    pub max: Option<f64>,
}

impl RangeFilter {
    /// A range filter constrains nothing unless one bound is set.
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Check a value against the bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Filter state for one listing view.
///
/// Values are never edited in place by the engine or the controller: every
/// `with_*` method returns a new value, and the result is compared
/// structurally for memoization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActiveFilters {
    /// Free-text search.
    #[serde(default)]
    pub search: String,
    /// Canonical category slug.
    #[serde(default)]
    pub category: Option<String>,
    /// Canonical brand slugs.
    #[serde(default)]
    pub brands: Vec<String>,
    /// Lower price bound in minor units.
    #[serde(default)]
    pub min_price: i64,
    /// Upper price bound in minor units; `None` is unrestricted.
    #[serde(default)]
    pub max_price: Option<i64>,
    /// Dropdown selections, at most one per attribute.
    #[serde(default)]
    pub custom_filters: Vec<CustomFilter>,
    /// Numeric range constraints, at most one per attribute.
    #[serde(default)]
    pub range_filters: Vec<RangeFilter>,
    /// Only certified pre-owned products.
    #[serde(default)]
    pub is_cpo: bool,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self.clone()
        }
    }

    /// Select a category (canonicalized), or clear it with `None`.
    pub fn with_category(&self, category: Option<&str>) -> Self {
        let category = category
            .map(canonical_category)
            .filter(|c| !c.is_empty());
        Self {
            category,
            ..self.clone()
        }
    }

    /// Replace the brand selection with canonical slugs. Empty and duplicate
    /// slugs are dropped.
    pub fn with_brands<I, S>(&self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for brand in brands {
            let brand = canonical_brand(brand.as_ref());
            if !brand.is_empty() && !out.contains(&brand) {
                out.push(brand);
            }
        }
        Self {
            brands: out,
            ..self.clone()
        }
    }

    /// Add the brand if absent, remove it if present.
    pub fn toggle_brand(&self, brand: &str) -> Self {
        let brand = canonical_brand(brand);
        if self.brands.contains(&brand) {
            let remaining: Vec<&str> = self
                .brands
                .iter()
                .map(String::as_str)
                .filter(|b| *b != brand)
                .collect();
            self.with_brands(remaining)
        } else {
            let mut brands = self.brands.clone();
            brands.push(brand);
            self.with_brands(brands)
        }
    }

    /// Set the price bounds, keeping `min <= max` and `min >= 0`.
    pub fn with_price(&self, min: i64, max: Option<i64>) -> Self {
        let (min_price, max_price) = normalize_price(min, max);
        Self {
            min_price,
            max_price,
            ..self.clone()
        }
    }

    /// Select a dropdown value; replaces an existing selection for the name.
    pub fn with_custom(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let filter = CustomFilter {
            name: name.into(),
            value: value.into(),
        };
        let mut custom_filters = self.custom_filters.clone();
        match custom_filters.iter_mut().find(|f| f.name == filter.name) {
            Some(existing) => *existing = filter,
            None => custom_filters.push(filter),
        }
        Self {
            custom_filters,
            ..self.clone()
        }
    }

    pub fn without_custom(&self, name: &str) -> Self {
        Self {
            custom_filters: self
                .custom_filters
                .iter()
                .filter(|f| f.name != name)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Constrain a range attribute. Passing no bounds removes the filter.
    pub fn with_range(&self, name: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        let name = name.into();
        let (min, max) = match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
            bounds => bounds,
        };
        let mut range_filters: Vec<RangeFilter> = self.range_filters.clone();
        let filter = RangeFilter {
            name: name.clone(),
            min,
            max,
        };
        let position = range_filters.iter().position(|f| f.name == name);
        match (position, filter.is_active()) {
            (Some(i), true) => range_filters[i] = filter,
            (Some(i), false) => {
                range_filters.remove(i);
            }
            (None, true) => range_filters.push(filter),
            (None, false) => {}
        }
        Self {
            range_filters,
            ..self.clone()
        }
    }

    pub fn with_cpo(&self, is_cpo: bool) -> Self {
        Self {
            is_cpo,
            ..self.clone()
        }
    }

    /// Reset every constraint except the category, which is navigation
    /// context rather than a panel filter.
    pub fn cleared(&self) -> Self {
        Self {
            category: self.category.clone(),
            ..Self::default()
        }
    }

    /// Whether the price bounds differ from the unrestricted default.
    pub fn has_price_constraint(&self) -> bool {
        self.min_price > 0 || self.max_price.is_some()
    }

    /// Number of active constraints, excluding category.
    pub fn active_count(&self) -> usize {
        let mut count = self.brands.len() + self.custom_filters.len();
        count += self.range_filters.iter().filter(|f| f.is_active()).count();
        if !self.search.is_empty() {
            count += 1;
        }
        if self.has_price_constraint() {
            count += 1;
        }
        if self.is_cpo {
            count += 1;
        }
        count
    }

    /// Lookup helpers for the filter panel.
    pub fn custom_value(&self, name: &str) -> Option<&str> {
        self.custom_filters
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn range(&self, name: &str) -> Option<&RangeFilter> {
        self.range_filters.iter().find(|f| f.name == name)
    }
}

/// Clamp negative minimums to zero, treat a negative maximum as
/// unrestricted and swap inverted bounds.
pub(crate) fn normalize_price(min: i64, max: Option<i64>) -> (i64, Option<i64>) {
    let min = min.max(0);
    match max {
        Some(max) if max < 0 => (min, None),
        Some(max) if max < min => (max, Some(min)),
        other => (min, other),
    }
}
