//! Listing snapshot: everything the engine needs for one listing view.

use crate::catalog::{
    canonical_brand, canonical_category, BrandFacetInfo, CategoryFacetInfo, ProductFacetRecord,
};
use crate::error::FacetError;
use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Product metadata and reference data for one category/listing context.
///
/// Fetched once per listing view and never mutated afterwards; share it
/// behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListingSnapshot {
    /// Product records.
    pub records: Vec<ProductFacetRecord>,
    /// Category reference data.
    #[serde(default)]
    pub categories: Vec<CategoryFacetInfo>,
    /// Brand reference data.
    #[serde(default)]
    pub brands: Vec<BrandFacetInfo>,
    /// Global price ceiling in minor units (0 = derive from records).
    #[serde(default)]
    pub price_ceiling: i64,
    /// Listing currency.
    #[serde(default)]
    pub currency: Currency,
}

impl ListingSnapshot {
    /// Create a snapshot from records only.
    pub fn new(records: Vec<ProductFacetRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<CategoryFacetInfo>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_brands(mut self, brands: Vec<BrandFacetInfo>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_price_ceiling(mut self, ceiling: i64) -> Self {
        self.price_ceiling = ceiling;
        self
    }

    /// Parse a snapshot payload, normalize category slugs and validate it.
    pub fn from_json(payload: &str) -> Result<Self, FacetError> {
        let mut snapshot: ListingSnapshot = serde_json::from_str(payload)
            .map_err(|e| FacetError::InvalidSnapshot(e.to_string()))?;
        snapshot.normalize();
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Rewrite category and brand slugs into canonical form.
    pub fn normalize(&mut self) {
        for record in &mut self.records {
            for category in &mut record.categories {
                *category = canonical_category(category);
            }
            record.categories.retain(|c| !c.is_empty());
            record.brand = record
                .brand
                .as_deref()
                .map(canonical_brand)
                .filter(|b| !b.is_empty());
        }
        for category in &mut self.categories {
            category.slug = canonical_category(&category.slug);
        }
        for brand in &mut self.brands {
            brand.slug = canonical_brand(&brand.slug);
        }
    }

    /// Check id uniqueness and price sanity.
    pub fn validate(&self) -> Result<(), FacetError> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.id.as_str()) {
                return Err(FacetError::DuplicateProduct(record.id.to_string()));
            }
            if let Some(price) = record.price {
                if price < 0 {
                    return Err(FacetError::InvalidRecord {
                        product_id: record.id.to_string(),
                        reason: format!("negative price {}", price),
                    });
                }
            }
        }
        if self.price_ceiling < 0 {
            return Err(FacetError::InvalidSnapshot(format!(
                "negative price ceiling {}",
                self.price_ceiling
            )));
        }
        Ok(())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Supplied ceiling, or the highest record price when none was supplied.
    pub fn effective_price_ceiling(&self) -> i64 {
        if self.price_ceiling > 0 {
            return self.price_ceiling;
        }
        self.records
            .iter()
            .filter_map(|r| r.price)
            .max()
            .unwrap_or(0)
    }

    /// Distinct dropdown attribute names present in the snapshot.
    pub fn attribute_names(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.attributes.iter().map(|a| a.name.as_str()))
            .collect()
    }

    /// Distinct range attribute names present in the snapshot.
    pub fn range_attribute_names(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.numeric_attributes.iter().map(|a| a.name.as_str()))
            .collect()
    }

    /// Look up category reference data by slug.
    pub fn category(&self, slug: &str) -> Option<&CategoryFacetInfo> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Look up brand reference data by slug.
    pub fn brand(&self, slug: &str) -> Option<&BrandFacetInfo> {
        self.brands.iter().find(|b| b.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_normalizes_categories() {
        let payload = r#"{
            "records": [
                {"id": "p1", "categories": ["/cars/suv/", ""], "price": 100},
                {"id": "p2", "brand": "volvo"}
            ],
            "categories": [{"id": "c1", "name": "SUV", "slug": "/cars/suv"}]
        }"#;

        let snapshot = ListingSnapshot::from_json(payload).unwrap();
        assert_eq!(snapshot.records[0].categories, vec!["cars/suv"]);
        assert_eq!(snapshot.categories[0].slug, "cars/suv");
        assert_eq!(snapshot.effective_price_ceiling(), 100);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let payload = r#"{"records": [{"id": "p1"}, {"id": "p1"}]}"#;
        let err = ListingSnapshot::from_json(payload).unwrap_err();
        assert!(matches!(err, FacetError::DuplicateProduct(id) if id == "p1"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let payload = r#"{"records": [{"id": "p1", "price": -5}]}"#;
        let err = ListingSnapshot::from_json(payload).unwrap_err();
        assert!(matches!(err, FacetError::InvalidRecord { .. }));
    }

    #[test]
    fn test_malformed_payload() {
        let err = ListingSnapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, FacetError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_attribute_names() {
        let snapshot = ListingSnapshot::new(vec![
            ProductFacetRecord::new("p1")
                .with_attribute("Color", "Blue")
                .with_numeric("Mileage", 10.0),
            ProductFacetRecord::new("p2").with_attribute("Fuel", "Diesel"),
        ]);
        assert_eq!(
            snapshot.attribute_names().into_iter().collect::<Vec<_>>(),
            vec!["Color", "Fuel"]
        );
        assert_eq!(
            snapshot.range_attribute_names().into_iter().collect::<Vec<_>>(),
            vec!["Mileage"]
        );
    }

    #[test]
    fn test_explicit_ceiling_wins() {
        let snapshot = ListingSnapshot::new(vec![ProductFacetRecord::new("p1").with_price(100)])
            .with_price_ceiling(5000);
        assert_eq!(snapshot.effective_price_ceiling(), 5000);
    }
}
