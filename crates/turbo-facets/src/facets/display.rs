//! Presentation of facet counts: reference data merged with computed
//! counts, and slider state for range facets.

use serde::{Deserialize, Serialize};

use crate::catalog::{hierarchy_order, ListingSnapshot};
use crate::facets::FacetResult;
use crate::filter::ActiveFilters;

/// Type of facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetType {
    /// Discrete values (brands, dropdown attributes).
    Terms,
    /// Numeric range (price, continuous attributes).
    Range,
    /// Hierarchical (nested categories).
    Hierarchy,
}

/// A single facet option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetValue {
    /// Value as it appears in filters (slug or attribute value).
    pub value: String,
    /// Display label.
    pub label: String,
    /// Products matching if this option were chosen.
    pub count: usize,
    /// Whether currently selected.
    pub selected: bool,
    /// Nesting depth (categories only).
    pub depth: usize,
}

/// A group of facet options for one dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetGroup {
    /// Facet name (e.g., "Category", "Color").
    pub name: String,
    /// Query-string key this facet filters on.
    pub field: String,
    /// Type of facet.
    pub facet_type: FacetType,
    /// Options, in display order.
    pub values: Vec<FacetValue>,
}

impl FacetGroup {
    fn new(name: impl Into<String>, field: impl Into<String>, facet_type: FacetType) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            facet_type,
            values: Vec::new(),
        }
    }

    /// Push an option unless it's both empty and unselected. Selected
    /// options stay visible so they can be removed.
    fn offer(&mut self, value: &str, label: &str, count: usize, selected: bool, depth: usize) {
        if count == 0 && !selected {
            return;
        }
        self.values.push(FacetValue {
            value: value.to_string(),
            label: label.to_string(),
            count,
            selected,
            depth,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Category options in hierarchy order. Categories counted in the snapshot
/// but missing from the reference data are appended under their slug.
pub fn category_group(snapshot: &ListingSnapshot, result: &FacetResult, filters: &ActiveFilters) -> FacetGroup {
    let mut group = FacetGroup::new("Category", "category", FacetType::Hierarchy);
    let selected = filters.category.as_deref();

    for (info, depth) in hierarchy_order(&snapshot.categories) {
        let count = result.category_count(&info.slug);
        group.offer(&info.slug, &info.name, count, selected == Some(info.slug.as_str()), depth);
    }

    for (slug, count) in &result.category_counts {
        if snapshot.category(slug).is_none() {
            group.offer(slug, slug, *count, selected == Some(slug.as_str()), 0);
        }
    }

    group
}

/// Brand options in reference order, unknown brands appended by slug.
pub fn brand_group(snapshot: &ListingSnapshot, result: &FacetResult, filters: &ActiveFilters) -> FacetGroup {
    let mut group = FacetGroup::new("Brand", "brands", FacetType::Terms);
    let is_selected = |slug: &str| filters.brands.iter().any(|b| b == slug);

    for info in &snapshot.brands {
        group.offer(&info.slug, &info.name, result.brand_count(&info.slug), is_selected(&info.slug), 0);
    }

    for (slug, count) in &result.brand_counts {
        if snapshot.brand(slug).is_none() {
            group.offer(slug, slug, *count, is_selected(slug), 0);
        }
    }

    // A selected brand that vanished from the snapshot is still removable.
    for slug in &filters.brands {
        if !group.values.iter().any(|v| &v.value == slug) {
            group.offer(slug, slug, 0, true, 0);
        }
    }

    group
}

/// One group per dropdown attribute, keyed by the slugified name.
pub fn attribute_groups(
    result: &FacetResult,
    filters: &ActiveFilters,
    slugify: fn(&str) -> String,
) -> Vec<FacetGroup> {
    let mut groups = Vec::with_capacity(result.attribute_counts.len());
    for (name, values) in &result.attribute_counts {
        let mut group = FacetGroup::new(name.as_str(), slugify(name), FacetType::Terms);
        let selected = filters.custom_value(name);
        for (value, count) in values {
            group.offer(value, value, *count, selected == Some(value.as_str()), 0);
        }
        if let Some(selected) = selected {
            if !values.contains_key(selected) {
                group.offer(selected, selected, 0, true, 0);
            }
        }
        groups.push(group);
    }
    groups
}

/// State of a range slider or min/max input pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SliderState {
    /// The range is adjustable between `floor` and `ceiling`.
    Enabled {
        floor: f64,
        ceiling: f64,
        low: f64,
        high: f64,
    },
    /// No adjustable range. An active value is still reported so the UI can
    /// show and remove it.
    Disabled {
        active_min: Option<f64>,
        active_max: Option<f64>,
    },
}

impl SliderState {
    /// Merge server-observed bounds with bounds of the filtered set.
    pub fn resolve(
        server: Option<(f64, f64)>,
        filtered: Option<(f64, f64)>,
        active_min: Option<f64>,
        active_max: Option<f64>,
    ) -> Self {
        let merged = match (server, filtered) {
            (Some((s_lo, s_hi)), Some((f_lo, f_hi))) => Some((s_lo.max(f_lo), s_hi.min(f_hi))),
            (Some(bounds), None) | (None, Some(bounds)) => Some(bounds),
            (None, None) => None,
        };

        match merged {
            Some((floor, ceiling)) if ceiling > floor => SliderState::Enabled {
                floor,
                ceiling,
                low: active_min.unwrap_or(floor).clamp(floor, ceiling),
                high: active_max.unwrap_or(ceiling).clamp(floor, ceiling),
            },
            _ => SliderState::Disabled {
                active_min,
                active_max,
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, SliderState::Enabled { .. })
    }
}

/// Price slider: server bounds are `[0, ceiling]`, filtered bounds come from
/// the price-relaxed pass.
pub fn price_slider(snapshot: &ListingSnapshot, result: &FacetResult, filters: &ActiveFilters) -> SliderState {
    let ceiling = snapshot.effective_price_ceiling() as f64;
    let filtered = (result.price_range.min as f64, result.price_range.max as f64);
    let active_min = (filters.min_price > 0).then_some(filters.min_price as f64);
    let active_max = filters.max_price.map(|m| m as f64);
    SliderState::resolve(Some((0.0, ceiling)), Some(filtered), active_min, active_max)
}

/// Range slider for a continuous attribute. `unfiltered` is the result for
/// default filters (server-observed bounds).
pub fn range_slider(
    name: &str,
    unfiltered: &FacetResult,
    result: &FacetResult,
    filters: &ActiveFilters,
) -> SliderState {
    let server = unfiltered.range_bounds.get(name).map(|b| (b.min, b.max));
    let filtered = result.range_bounds.get(name).map(|b| (b.min, b.max));
    let active = filters.range(name);
    let (active_min, active_max) = active.map_or((None, None), |r| (r.min, r.max));

    // A filtered set with no values at all is degenerate, not unknown.
    if server.is_some() && filtered.is_none() {
        return SliderState::Disabled {
            active_min,
            active_max,
        };
    }
    SliderState::resolve(server, filtered, active_min, active_max)
}
