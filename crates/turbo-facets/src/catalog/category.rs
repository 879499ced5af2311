//! Static category and brand reference data.

use crate::ids::{BrandId, CategoryId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A category as supplied by the catalog for one listing context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryFacetInfo {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Canonical slug (slash-delimited path, no leading or trailing slash).
    pub slug: String,
    /// Parent category ID (None for root categories).
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl CategoryFacetInfo {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: canonical_category(slug),
            parent_id: None,
        }
    }

    /// Attach a parent category.
    pub fn with_parent(mut self, parent: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A brand as supplied by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandFacetInfo {
    /// Unique brand identifier.
    pub id: BrandId,
    /// Display name.
    pub name: String,
    /// Canonical slug.
    pub slug: String,
}

impl BrandFacetInfo {
    pub fn new(id: impl Into<BrandId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: canonical_brand(&slug.into()),
        }
    }
}

/// Normalize a category path to its canonical form.
///
/// Empty segments are dropped, so `/cars//suv/` becomes `cars/suv`.
pub fn canonical_category(raw: &str) -> String {
    raw.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize a brand reference to its bare slug.
///
/// Brands are flat, so a route path such as `/brands/volvo/` keeps only its
/// last segment.
pub fn canonical_brand(raw: &str) -> String {
    raw.rsplit('/')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Order categories depth-first, parents before children, keeping the
/// supplied order among siblings. Returns each category with its depth.
///
/// Categories whose parent is not in the list are treated as roots. Cycles
/// are broken at the first revisit.
pub fn hierarchy_order(categories: &[CategoryFacetInfo]) -> Vec<(&CategoryFacetInfo, usize)> {
    let known: HashSet<&CategoryId> = categories.iter().map(|c| &c.id).collect();
    let mut visited: HashSet<&CategoryId> = HashSet::new();
    let mut ordered = Vec::with_capacity(categories.len());

    fn visit<'a>(
        node: &'a CategoryFacetInfo,
        depth: usize,
        all: &'a [CategoryFacetInfo],
        visited: &mut HashSet<&'a CategoryId>,
        out: &mut Vec<(&'a CategoryFacetInfo, usize)>,
    ) {
        if !visited.insert(&node.id) {
            return;
        }
        out.push((node, depth));
        for child in all.iter().filter(|c| c.parent_id.as_ref() == Some(&node.id)) {
            visit(child, depth + 1, all, visited, out);
        }
    }

    for category in categories {
        let is_root = match &category.parent_id {
            None => true,
            Some(parent) => !known.contains(parent),
        };
        if is_root {
            visit(category, 0, categories, &mut visited, &mut ordered);
        }
    }

    // Anything left over sits on a cycle.
    for category in categories {
        visit(category, 0, categories, &mut visited, &mut ordered);
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_category() {
        assert_eq!(canonical_category("/cars//suv/"), "cars/suv");
        assert_eq!(canonical_category("cars"), "cars");
        assert_eq!(canonical_category("///"), "");
    }

    #[test]
    fn test_canonical_brand() {
        assert_eq!(canonical_brand("/brands/volvo/"), "volvo");
        assert_eq!(canonical_brand(" audi "), "audi");
        assert_eq!(canonical_brand("//"), "");
        assert_eq!(BrandFacetInfo::new("b1", "Volvo", "/brands/volvo").slug, "volvo");
    }

    #[test]
    fn test_root_category() {
        let cat = CategoryFacetInfo::new("c1", "Cars", "/cars/");
        assert!(cat.is_root());
        assert_eq!(cat.slug, "cars");
    }

    #[test]
    fn test_hierarchy_order() {
        let categories = vec![
            CategoryFacetInfo::new("suv", "SUV", "cars/suv").with_parent("cars"),
            CategoryFacetInfo::new("bikes", "Bikes", "bikes"),
            CategoryFacetInfo::new("cars", "Cars", "cars"),
            CategoryFacetInfo::new("compact", "Compact SUV", "cars/suv/compact").with_parent("suv"),
        ];

        let ordered: Vec<(&str, usize)> = hierarchy_order(&categories)
            .into_iter()
            .map(|(c, depth)| (c.id.as_str(), depth))
            .collect();

        assert_eq!(
            ordered,
            vec![("bikes", 0), ("cars", 0), ("suv", 1), ("compact", 2)]
        );
    }

    #[test]
    fn test_hierarchy_order_survives_cycles() {
        let categories = vec![
            CategoryFacetInfo::new("a", "A", "a").with_parent("b"),
            CategoryFacetInfo::new("b", "B", "b").with_parent("a"),
        ];
        assert_eq!(hierarchy_order(&categories).len(), 2);
    }
}
