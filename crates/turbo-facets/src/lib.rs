//! Faceted product filtering for TurboCommerce listing pages.
//!
//! This crate provides the pure half of a product listing page:
//!
//! - **Catalog**: Per-product facet records, category/brand reference data, snapshots
//! - **Filter**: Active filter state and the predicate expression shared by every consumer
//! - **Facets**: Disjunctive facet counts, price/range bounds, memoization, display groups
//! - **Listing**: Paginated listing query (SQL or in-memory)
//! - **Codec**: Address-bar query string <-> listing state
//!
//! # Example
//!
//! ```rust
//! use turbo_facets::prelude::*;
//!
//! let snapshot = ListingSnapshot::new(vec![
//!     ProductFacetRecord::new("p1").with_category("cars").with_brand("volvo").with_price(1500),
//!     ProductFacetRecord::new("p2").with_category("cars").with_brand("audi").with_price(2500),
//! ]);
//!
//! let codec = QueryCodec::for_snapshot(CodecConfig::default(), &snapshot);
//! let state = codec.decode(&Location::parse("/category/cars?brands=volvo"));
//!
//! let facets = FacetEngine::new(&snapshot).compute(&state.filters);
//! assert_eq!(facets.brand_count("audi"), 1);
//! assert_eq!(facets.match_count, 1);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod codec;
pub mod facets;
pub mod filter;
pub mod listing;

pub use error::FacetError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::FacetError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        BrandFacetInfo, CategoryFacetInfo, ListingSnapshot, ProductFacetRecord,
    };

    // Filter
    pub use crate::filter::{ActiveFilters, Dimension, FilterExpr, Predicate, SearchHits};

    // Facets
    pub use crate::facets::{FacetCache, FacetEngine, FacetResult, PriceRange, SliderState};

    // Listing
    pub use crate::listing::{ListingPage, ListingQuery, Pagination, SortOption};

    // Codec
    pub use crate::codec::{CategoryRouting, CodecConfig, ListingState, Location, QueryCodec};
}
