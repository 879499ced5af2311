//! Facet engine error types.
//!
//! Filtering, counting and query-string decoding are total and never
//! produce these. Only the outer loading surfaces do.

use thiserror::Error;

/// Errors that can occur while loading listing data or configuration.
#[derive(Error, Debug)]
pub enum FacetError {
    /// Snapshot payload could not be parsed.
    #[error("Invalid listing snapshot: {0}")]
    InvalidSnapshot(String),

    /// A record failed validation when the snapshot was assembled.
    #[error("Invalid product record {product_id}: {reason}")]
    InvalidRecord { product_id: String, reason: String },

    /// Duplicate product id in one snapshot.
    #[error("Duplicate product id in snapshot: {0}")]
    DuplicateProduct(String),

    /// Codec configuration is unusable.
    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),

}
