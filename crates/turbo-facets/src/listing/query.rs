//! Paginated listing query.
//!
//! This is the second consumer of `FilterExpr`: the same expression that
//! drives facet counts is rendered to SQL for the listing service, or run
//! in memory against a snapshot.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::ProductFacetRecord;
use crate::filter::{ActiveFilters, Dimension, FilterExpr, SearchHits};
use crate::ids::ProductId;
use crate::listing::{ListingPage, Pagination};
use serde::{Deserialize, Serialize};

/// Sort options for listing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Merchandised position.
    #[default]
    Featured,
    /// Search relevance (falls back to position without a search).
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by newest first.
    Newest,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
}

impl SortOption {
    /// Query-string value.
    pub fn as_key(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::Relevance => "relevance",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::Newest => "newest",
            SortOption::NameAsc => "name_asc",
            SortOption::NameDesc => "name_desc",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "featured" => Some(SortOption::Featured),
            "relevance" => Some(SortOption::Relevance),
            "price_asc" => Some(SortOption::PriceAsc),
            "price_desc" => Some(SortOption::PriceDesc),
            "newest" => Some(SortOption::Newest),
            "name_asc" => Some(SortOption::NameAsc),
            "name_desc" => Some(SortOption::NameDesc),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::Relevance => "Relevance",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::Newest => "Newest",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
        }
    }

    /// SQL ORDER BY clause. Relevance is rendered by the query because it
    /// needs the ranking parameters.
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOption::Featured | SortOption::Relevance => "position ASC",
            SortOption::PriceAsc => "price_cents IS NULL, price_cents ASC",
            SortOption::PriceDesc => "price_cents IS NULL, price_cents DESC",
            SortOption::Newest => "created_at DESC",
            SortOption::NameAsc => "name ASC",
            SortOption::NameDesc => "name DESC",
        }
    }
}

/// A listing query: filter expression, ordering and page window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Filters to apply.
    pub expr: FilterExpr,
    /// Relevance-ordered ids, empty unless a search constrains the listing.
    pub ranking: Vec<ProductId>,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl ListingQuery {
    /// Build a query from filter state and optional scorer output.
    pub fn new(filters: &ActiveFilters, hits: Option<&SearchHits>) -> Self {
        let expr = FilterExpr::from_filters(filters, hits);
        let searched = expr.clauses().iter().any(|c| c.dimension == Dimension::Search);
        let ranking = match hits {
            Some(hits) if searched => hits.ranked().to_vec(),
            _ => Vec::new(),
        };
        Self {
            expr,
            ranking,
            sort: SortOption::default(),
            page: 1,
            per_page: 24,
        }
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: u32, per_page: u32) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Offset for SQL LIMIT/OFFSET.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1) * self.per_page as usize
    }

    /// Build SQL WHERE clause from the filter expression.
    pub fn build_where_clause(&self) -> (String, Vec<String>) {
        self.expr.to_where_clause()
    }

    /// Build ORDER BY clause and its parameters.
    pub fn build_order_by(&self) -> (String, Vec<String>) {
        if self.sort != SortOption::Relevance || self.ranking.is_empty() {
            return (self.sort.to_sql().to_string(), vec![]);
        }

        let mut sql = String::from("CASE id");
        let mut values = Vec::with_capacity(self.ranking.len());
        for (rank, id) in self.ranking.iter().enumerate() {
            sql.push_str(&format!(" WHEN ? THEN {}", rank));
            values.push(id.as_str().to_string());
        }
        sql.push_str(&format!(" ELSE {} END, position ASC", self.ranking.len()));
        (sql, values)
    }

    /// Build full SQL query for one page of products.
    pub fn build_sql(&self) -> (String, Vec<String>) {
        let (where_clause, mut values) = self.build_where_clause();
        let (order_by, order_values) = self.build_order_by();
        values.extend(order_values);

        let sql = format!(
            "SELECT * FROM products WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            where_clause,
            order_by,
            self.per_page,
            self.offset()
        );

        (sql, values)
    }

    /// Build count SQL query.
    pub fn build_count_sql(&self) -> (String, Vec<String>) {
        let (where_clause, values) = self.build_where_clause();
        let sql = format!("SELECT COUNT(*) as count FROM products WHERE {}", where_clause);
        (sql, values)
    }

    /// Run the query in memory against snapshot records.
    ///
    /// Records carry no name or creation date, so name and date sorts keep
    /// the snapshot's own order, which upstream delivers in position order.
    pub fn execute<'a>(&self, records: &'a [ProductFacetRecord]) -> ListingPage<'a> {
        let mut matching: Vec<&ProductFacetRecord> =
            records.iter().filter(|r| self.expr.matches(r)).collect();

        match self.sort {
            SortOption::PriceAsc => matching.sort_by(|a, b| by_price(a, b, false)),
            SortOption::PriceDesc => matching.sort_by(|a, b| by_price(a, b, true)),
            SortOption::Relevance if !self.ranking.is_empty() => {
                // Reversed so a repeated id keeps its first rank.
                let ranks: HashMap<&ProductId, usize> =
                    self.ranking.iter().enumerate().rev().map(|(i, id)| (id, i)).collect();
                let unranked = self.ranking.len();
                matching.sort_by_key(|r| ranks.get(&r.id).copied().unwrap_or(unranked));
            }
            _ => {}
        }

        let pagination = Pagination::new(self.page, self.per_page, matching.len());
        let items = matching
            .into_iter()
            .skip(pagination.offset())
            .take(self.per_page as usize)
            .collect();

        ListingPage { items, pagination }
    }
}

/// Missing prices sort last in both directions.
fn by_price(a: &ProductFacetRecord, b: &ProductFacetRecord, descending: bool) -> Ordering {
    match (a.price, b.price) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ProductFacetRecord> {
        vec![
            ProductFacetRecord::new("p1").with_brand("volvo").with_price(300),
            ProductFacetRecord::new("p2").with_brand("audi"),
            ProductFacetRecord::new("p3").with_brand("volvo").with_price(100),
            ProductFacetRecord::new("p4").with_brand("volvo").with_price(200),
        ]
    }

    fn ids(page: &ListingPage<'_>) -> Vec<String> {
        page.items.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_sort_keys_round_trip() {
        for sort in [
            SortOption::Featured,
            SortOption::Relevance,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::Newest,
            SortOption::NameAsc,
            SortOption::NameDesc,
        ] {
            assert_eq!(SortOption::from_key(sort.as_key()), Some(sort));
        }
        assert_eq!(SortOption::from_key("bogus"), None);
    }

    #[test]
    fn test_query_builder() {
        let query = ListingQuery::new(&ActiveFilters::new(), None)
            .with_sort(SortOption::PriceAsc)
            .with_pagination(2, 10);

        assert_eq!(query.page, 2);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.offset(), 10);

        let clamped = ListingQuery::new(&ActiveFilters::new(), None).with_pagination(0, 500);
        assert_eq!((clamped.page, clamped.per_page), (1, 100));
    }

    #[test]
    fn test_full_sql() {
        let filters = ActiveFilters::new().with_brands(["volvo"]);
        let query = ListingQuery::new(&filters, None)
            .with_sort(SortOption::Newest)
            .with_pagination(1, 24);

        let (sql, values) = query.build_sql();
        assert!(sql.starts_with("SELECT * FROM products WHERE (brand_slug IN (?))"));
        assert!(sql.contains("ORDER BY created_at DESC"));
        assert!(sql.ends_with("LIMIT 24 OFFSET 0"));
        assert_eq!(values, vec!["volvo"]);

        let (count_sql, _) = query.build_count_sql();
        assert!(count_sql.starts_with("SELECT COUNT(*)"));
    }

    #[test]
    fn test_relevance_order_by_uses_ranking() {
        let hits = SearchHits::new(["p4", "p1"].map(ProductId::from));
        let filters = ActiveFilters::new().with_search("wagon");
        let query = ListingQuery::new(&filters, Some(&hits)).with_sort(SortOption::Relevance);

        let (sql, values) = query.build_sql();
        assert!(sql.contains("ORDER BY CASE id WHEN ? THEN 0 WHEN ? THEN 1 ELSE 2 END, position ASC"));
        // WHERE params (id set, sorted) precede ORDER BY params (ranked).
        assert_eq!(values, vec!["p1", "p4", "p4", "p1"]);

        let records = records();
        assert_eq!(ids(&query.execute(&records)), vec!["p4", "p1"]);
    }

    #[test]
    fn test_zero_page_offsets_from_start() {
        let query = ListingQuery {
            page: 0,
            ..ListingQuery::new(&ActiveFilters::new(), None).with_pagination(1, 2)
        };
        assert_eq!(query.offset(), 0);

        let records = records();
        let page = query.execute(&records);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(ids(&page), vec!["p1", "p2"]);
    }

    #[test]
    fn test_relevance_ranks_unknown_ids_last() {
        let hits = SearchHits::new(["p3", "p1", "p4", "p2"].map(ProductId::from));
        let filters = ActiveFilters::new().with_search("volvo");
        let mut query = ListingQuery::new(&filters, Some(&hits)).with_sort(SortOption::Relevance);
        query.ranking = ["p4", "p3", "p4"].map(ProductId::from).to_vec();

        let records = records();
        assert_eq!(ids(&query.execute(&records)), vec!["p4", "p3", "p1", "p2"]);
    }

    #[test]
    fn test_execute_price_sort_and_pagination() {
        let records = records();
        let query = ListingQuery::new(&ActiveFilters::new(), None)
            .with_sort(SortOption::PriceAsc)
            .with_pagination(1, 3);
        let page = query.execute(&records);
        assert_eq!(ids(&page), vec!["p3", "p4", "p1"]);
        assert_eq!(page.pagination.total, 4);
        assert!(page.pagination.has_next);

        let page = query.clone().with_pagination(2, 3).execute(&records);
        assert_eq!(ids(&page), vec!["p2"]);

        let desc = ListingQuery::new(&ActiveFilters::new(), None).with_sort(SortOption::PriceDesc);
        assert_eq!(ids(&desc.execute(&records)), vec!["p1", "p4", "p3", "p2"]);
    }

    #[test]
    fn test_execute_applies_filters() {
        let records = records();
        let filters = ActiveFilters::new().with_brands(["volvo"]).with_price(150, None);
        let page = ListingQuery::new(&filters, None).execute(&records);
        assert_eq!(ids(&page), vec!["p1", "p4"]);
    }
}
