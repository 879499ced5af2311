//! Lightweight per-product facet metadata.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A discrete (dropdown) attribute value, e.g. `Color: Blue`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AttributeValue {
    /// Attribute display name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl AttributeValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A continuous (range) attribute value, e.g. `Mileage: 42000`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericAttribute {
    /// Attribute display name.
    pub name: String,
    /// Numeric value.
    pub value: f64,
}

impl NumericAttribute {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Immutable snapshot entry for one product in a listing context.
///
/// Every field except the id may be absent in upstream payloads. A record
/// missing the data a constraint looks at simply fails that constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductFacetRecord {
    /// Product identifier.
    pub id: ProductId,
    /// Canonical category slugs this product belongs to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Canonical brand slug.
    #[serde(default)]
    pub brand: Option<String>,
    /// Price in minor currency units.
    #[serde(default)]
    pub price: Option<i64>,
    /// Discrete attribute values.
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
    /// Continuous attribute values.
    #[serde(default)]
    pub numeric_attributes: Vec<NumericAttribute>,
    /// Certified pre-owned flag.
    #[serde(default)]
    pub is_cpo: bool,
}

impl ProductFacetRecord {
    /// Create an empty record for a product.
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            categories: Vec::new(),
            brand: None,
            price: None,
            attributes: Vec::new(),
            numeric_attributes: Vec::new(),
            is_cpo: false,
        }
    }

    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.categories.push(slug.into());
        self
    }

    pub fn with_brand(mut self, slug: &str) -> Self {
        self.brand = Some(super::canonical_brand(slug));
        self
    }

    pub fn with_price(mut self, minor_units: i64) -> Self {
        self.price = Some(minor_units);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(AttributeValue::new(name, value));
        self
    }

    pub fn with_numeric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.numeric_attributes.push(NumericAttribute::new(name, value));
        self
    }

    pub fn certified(mut self) -> Self {
        self.is_cpo = true;
        self
    }

    /// Check category membership.
    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c == slug)
    }

    /// Check whether the record carries `name: value`.
    pub fn has_attribute(&self, name: &str, value: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.name == name && a.value == value)
    }

    /// Every numeric value recorded for an attribute. NaN values are
    /// treated as missing.
    pub fn numeric_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.numeric_attributes
            .iter()
            .filter(move |a| a.name == name && !a.value.is_nan())
            .map(|a| a.value)
    }

    /// Values recorded for a dropdown attribute, deduplicated.
    pub(crate) fn attribute_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .enumerate()
            .filter(move |(i, a)| {
                a.name == name
                    && !self.attributes[..*i]
                        .iter()
                        .any(|prev| prev.name == name && prev.value == a.value)
            })
            .map(|(_, a)| a.value.as_str())
    }

    /// Distinct category slugs, in first-seen order.
    pub(crate) fn distinct_categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .enumerate()
            .filter(move |(i, c)| !self.categories[..*i].contains(*c))
            .map(|(_, c)| c.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = ProductFacetRecord::new("p1")
            .with_category("cars/suv")
            .with_brand("volvo")
            .with_price(2_500_000)
            .with_attribute("Color", "Blue")
            .with_numeric("Mileage", 42000.0)
            .certified();

        assert!(record.in_category("cars/suv"));
        assert!(!record.in_category("cars"));
        assert!(record.has_attribute("Color", "Blue"));
        assert!(!record.has_attribute("Color", "Red"));
        assert_eq!(record.numeric_values("Mileage").collect::<Vec<_>>(), vec![42000.0]);
        assert_eq!(record.numeric_values("Doors").count(), 0);
        assert!(record.is_cpo);
    }

    #[test]
    fn test_nan_numeric_is_missing() {
        let record = ProductFacetRecord::new("p1")
            .with_numeric("Mileage", f64::NAN)
            .with_numeric("Mileage", 7.0);
        assert_eq!(record.numeric_values("Mileage").collect::<Vec<_>>(), vec![7.0]);
    }

    #[test]
    fn test_attribute_values_deduplicated() {
        let record = ProductFacetRecord::new("p1")
            .with_attribute("Color", "Blue")
            .with_attribute("Fuel", "Diesel")
            .with_attribute("Color", "Blue")
            .with_attribute("Color", "Red");
        let values: Vec<_> = record.attribute_values("Color").collect();
        assert_eq!(values, vec!["Blue", "Red"]);
    }

    #[test]
    fn test_distinct_categories() {
        let record = ProductFacetRecord::new("p1")
            .with_category("a")
            .with_category("b")
            .with_category("a");
        let cats: Vec<_> = record.distinct_categories().collect();
        assert_eq!(cats, vec!["a", "b"]);
    }

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let record: ProductFacetRecord = serde_json::from_str(r#"{"id":"p9"}"#).unwrap();
        assert_eq!(record.id.as_str(), "p9");
        assert!(record.categories.is_empty());
        assert_eq!(record.price, None);
        assert!(!record.is_cpo);
    }
}
