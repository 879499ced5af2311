//! Facets module.
//!
//! Contains the facet count engine, its memoizing cache, and the display
//! helpers that merge counts with reference data.

mod cache;
mod display;
mod engine;
mod result;

pub use cache::{CacheStats, FacetCache};
pub use display::{
    attribute_groups, brand_group, category_group, price_slider, range_slider, FacetGroup,
    FacetType, FacetValue, SliderState,
};
pub use engine::{compute, FacetEngine};
pub use result::{FacetResult, PriceRange, RangeBounds};
