//! Filter module.
//!
//! Contains the active filter state, the predicate expression tree shared by
//! the in-memory evaluator and the SQL listing query, and search hits.

mod active;
mod expr;
mod search;
mod sql;

pub use active::{ActiveFilters, CustomFilter, RangeFilter};
pub(crate) use active::normalize_price;
pub use expr::{matches, Clause, Dimension, FilterExpr, Predicate};
pub use search::SearchHits;
