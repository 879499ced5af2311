//! Filter expression tree.
//!
//! `ActiveFilters` is lowered once into a flat conjunction of
//! dimension-tagged predicates. The in-memory evaluator below and the SQL
//! renderer in `sql.rs` both walk this tree, so the facet counts and the
//! paginated listing can't drift apart on what "matching" means.

use crate::catalog::ProductFacetRecord;
use crate::filter::{ActiveFilters, SearchHits};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One filterable dimension of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Dimension {
    Category,
    Brand,
    Price,
    /// A dropdown attribute, by display name.
    Attribute(String),
    /// A continuous attribute, by display name.
    Range(String),
    Certified,
    Search,
}

/// A single constraint on a product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Record belongs to the category.
    InCategory { slug: String },
    /// Record's brand is one of the slugs.
    BrandIn { slugs: Vec<String> },
    /// Record's price lies in `[min, max]`.
    PriceBetween { min: i64, max: Option<i64> },
    /// Record carries `name: value`.
    AttributeEquals { name: String, value: String },
    /// Some numeric value of `name` lies within the bounds.
    AttributeBetween {
        name: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Record is certified pre-owned.
    Certified,
    /// Record is among the search hits.
    IdIn { ids: BTreeSet<ProductId> },
}

impl Predicate {
    /// Evaluate against a record. Missing data never matches.
    pub fn matches(&self, record: &ProductFacetRecord) -> bool {
        match self {
            Predicate::InCategory { slug } => record.in_category(slug),
            Predicate::BrandIn { slugs } => record
                .brand
                .as_ref()
                .map_or(false, |brand| slugs.iter().any(|s| s == brand)),
            Predicate::PriceBetween { min, max } => record
                .price
                .map_or(false, |price| price >= *min && max.map_or(true, |max| price <= max)),
            Predicate::AttributeEquals { name, value } => record.has_attribute(name, value),
            Predicate::AttributeBetween { name, min, max } => record.numeric_values(name).any(|v| {
                min.map_or(true, |min| v >= min) && max.map_or(true, |max| v <= max)
            }),
            Predicate::Certified => record.is_cpo,
            Predicate::IdIn { ids } => ids.contains(&record.id),
        }
    }
}

/// A predicate tagged with the dimension it constrains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub dimension: Dimension,
    pub predicate: Predicate,
}

/// Conjunction of clauses. An empty expression matches everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterExpr {
    clauses: Vec<Clause>,
}

impl FilterExpr {
    /// Lower filter state into an expression.
    ///
    /// The search clause is only emitted when the caller has scorer output
    /// for a non-empty search; free text alone can't be evaluated here.
    pub fn from_filters(filters: &ActiveFilters, hits: Option<&SearchHits>) -> Self {
        let mut clauses = Vec::new();

        if let Some(slug) = &filters.category {
            clauses.push(Clause {
                dimension: Dimension::Category,
                predicate: Predicate::InCategory { slug: slug.clone() },
            });
        }

        if !filters.brands.is_empty() {
            clauses.push(Clause {
                dimension: Dimension::Brand,
                predicate: Predicate::BrandIn {
                    slugs: filters.brands.clone(),
                },
            });
        }

        if filters.has_price_constraint() {
            clauses.push(Clause {
                dimension: Dimension::Price,
                predicate: Predicate::PriceBetween {
                    min: filters.min_price,
                    max: filters.max_price,
                },
            });
        }

        for custom in &filters.custom_filters {
            clauses.push(Clause {
                dimension: Dimension::Attribute(custom.name.clone()),
                predicate: Predicate::AttributeEquals {
                    name: custom.name.clone(),
                    value: custom.value.clone(),
                },
            });
        }

        for range in filters.range_filters.iter().filter(|r| r.is_active()) {
            clauses.push(Clause {
                dimension: Dimension::Range(range.name.clone()),
                predicate: Predicate::AttributeBetween {
                    name: range.name.clone(),
                    min: range.min,
                    max: range.max,
                },
            });
        }

        if filters.is_cpo {
            clauses.push(Clause {
                dimension: Dimension::Certified,
                predicate: Predicate::Certified,
            });
        }

        if let Some(hits) = hits.filter(|_| !filters.search.trim().is_empty()) {
            clauses.push(Clause {
                dimension: Dimension::Search,
                predicate: Predicate::IdIn {
                    ids: hits.ranked().iter().cloned().collect(),
                },
            });
        }

        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Copy of the expression with one dimension's clauses removed.
    pub fn without(&self, dimension: &Dimension) -> Self {
        Self {
            clauses: self
                .clauses
                .iter()
                .filter(|c| &c.dimension != dimension)
                .cloned()
                .collect(),
        }
    }

    /// Evaluate every clause.
    pub fn matches(&self, record: &ProductFacetRecord) -> bool {
        self.matches_relaxing(record, None)
    }

    /// Evaluate every clause except those on the relaxed dimension.
    pub fn matches_relaxing(&self, record: &ProductFacetRecord, relax: Option<&Dimension>) -> bool {
        self.clauses
            .iter()
            .filter(|c| Some(&c.dimension) != relax)
            .all(|c| c.predicate.matches(record))
    }
}

/// Decide whether a record satisfies `filters` with at most one dimension
/// relaxed.
pub fn matches(record: &ProductFacetRecord, filters: &ActiveFilters, exclude: Option<&Dimension>) -> bool {
    FilterExpr::from_filters(filters, None).matches_relaxing(record, exclude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProductFacetRecord {
        ProductFacetRecord::new("p1")
            .with_category("cars")
            .with_brand("volvo")
            .with_price(300)
            .with_attribute("Color", "Blue")
            .with_numeric("Mileage", 42.0)
    }

    #[test]
    fn test_default_filters_match_everything() {
        assert!(matches(&record(), &ActiveFilters::new(), None));
        assert!(matches(&ProductFacetRecord::new("bare"), &ActiveFilters::new(), None));
    }

    #[test]
    fn test_each_dimension_applies() {
        let r = record();
        let base = ActiveFilters::new();

        assert!(matches(&r, &base.with_category(Some("cars")), None));
        assert!(!matches(&r, &base.with_category(Some("bikes")), None));

        assert!(matches(&r, &base.with_brands(["audi", "volvo"]), None));
        assert!(!matches(&r, &base.with_brands(["audi"]), None));

        assert!(matches(&r, &base.with_price(300, Some(300)), None));
        assert!(!matches(&r, &base.with_price(301, None), None));
        assert!(!matches(&r, &base.with_price(0, Some(299)), None));

        assert!(!matches(&r, &base.with_cpo(true), None));
    }

    #[test]
    fn test_excluded_dimension_is_skipped() {
        let r = record();
        let filters = ActiveFilters::new()
            .with_category(Some("bikes"))
            .with_brands(["audi"])
            .with_price(0, Some(10));

        assert!(!matches(&r, &filters, Some(&Dimension::Category)));
        let only_category = ActiveFilters::new().with_category(Some("bikes"));
        assert!(matches(&r, &only_category, Some(&Dimension::Category)));
        assert!(matches(
            &r,
            &ActiveFilters::new().with_brands(["audi"]),
            Some(&Dimension::Brand)
        ));
        assert!(matches(
            &r,
            &ActiveFilters::new().with_price(0, Some(10)),
            Some(&Dimension::Price)
        ));
    }

    #[test]
    fn test_custom_filters_are_anded() {
        let r = record().with_attribute("Fuel", "Diesel");
        let both = ActiveFilters::new()
            .with_custom("Color", "Blue")
            .with_custom("Fuel", "Diesel");
        assert!(matches(&r, &both, None));

        let one_wrong = both.with_custom("Fuel", "Petrol");
        assert!(!matches(&r, &one_wrong, None));
        assert!(matches(&r, &one_wrong, Some(&Dimension::Attribute("Fuel".into()))));
    }

    #[test]
    fn test_missing_attribute_fails() {
        let bare = ProductFacetRecord::new("bare").with_price(100);
        assert!(!matches(&bare, &ActiveFilters::new().with_custom("Color", "Blue"), None));
        assert!(!matches(&bare, &ActiveFilters::new().with_range("Mileage", Some(0.0), None), None));
        assert!(!matches(&ProductFacetRecord::new("x"), &ActiveFilters::new().with_price(1, None), None));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let r = record();
        assert!(matches(&r, &ActiveFilters::new().with_range("Mileage", Some(42.0), Some(42.0)), None));
        assert!(matches(&r, &ActiveFilters::new().with_range("Mileage", None, Some(50.0)), None));
        assert!(!matches(&r, &ActiveFilters::new().with_range("Mileage", Some(43.0), None), None));
    }

    #[test]
    fn test_search_clause_needs_hits_and_text() {
        let r = record();
        let hits = SearchHits::new([ProductId::new("p2")]);
        let filters = ActiveFilters::new().with_search("estate");

        assert!(FilterExpr::from_filters(&filters, None).matches(&r));
        assert!(!FilterExpr::from_filters(&filters, Some(&hits)).matches(&r));
        assert!(FilterExpr::from_filters(&ActiveFilters::new(), Some(&hits)).matches(&r));
    }

    #[test]
    fn test_without_drops_dimension() {
        let filters = ActiveFilters::new()
            .with_category(Some("bikes"))
            .with_custom("Color", "Blue");
        let expr = FilterExpr::from_filters(&filters, None);
        assert_eq!(expr.clauses().len(), 2);

        let relaxed = expr.without(&Dimension::Category);
        assert_eq!(relaxed.clauses().len(), 1);
        assert!(relaxed.matches(&record()));
    }

    #[test]
    fn test_expression_serializes() {
        let filters = ActiveFilters::new().with_brands(["volvo"]).with_cpo(true);
        let expr = FilterExpr::from_filters(&filters, None);
        let json = serde_json::to_string(&expr).unwrap();
        assert!(json.contains("\"op\":\"brand_in\""));
        let back: FilterExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
