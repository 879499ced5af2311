//! Listing module.
//!
//! Contains the paginated listing query built from the shared filter
//! expression, and pagination results.

mod query;
mod results;

pub use query::{ListingQuery, SortOption};
pub use results::{ListingPage, Pagination};
