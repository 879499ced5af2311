//! Product catalog module.
//!
//! Contains the per-product facet records, category and brand reference
//! data, and the listing snapshot that bundles them.

mod category;
mod product;
mod snapshot;

pub use category::{canonical_brand, canonical_category, hierarchy_order, BrandFacetInfo, CategoryFacetInfo};
pub use product::{AttributeValue, NumericAttribute, ProductFacetRecord};
pub use snapshot::ListingSnapshot;
