//! SQL rendering of filter expressions for the paginated listing query.
//!
//! Schema assumed by the listing service:
//! `products(id, brand_slug, price_cents, is_cpo, position, created_at)`,
//! `product_categories(product_id, category_slug)`,
//! `product_attributes(product_id, name, value)`,
//! `product_numeric_attributes(product_id, name, value)`.

use crate::filter::{FilterExpr, Predicate};

impl Predicate {
    /// Build SQL WHERE clause component with bound parameters.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        match self {
            Predicate::InCategory { slug } => (
                "id IN (SELECT product_id FROM product_categories WHERE category_slug = ?)".to_string(),
                vec![slug.clone()],
            ),
            Predicate::BrandIn { slugs } => {
                let placeholders = slugs.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                (format!("brand_slug IN ({})", placeholders), slugs.clone())
            }
            Predicate::PriceBetween { min, max } => {
                // The lower bound is always emitted so NULL prices never match.
                let mut sql = "price_cents >= ?".to_string();
                let mut values = vec![min.to_string()];
                if let Some(max) = max {
                    sql.push_str(" AND price_cents <= ?");
                    values.push(max.to_string());
                }
                (sql, values)
            }
            Predicate::AttributeEquals { name, value } => (
                "id IN (SELECT product_id FROM product_attributes WHERE name = ? AND value = ?)".to_string(),
                vec![name.clone(), value.clone()],
            ),
            Predicate::AttributeBetween { name, min, max } => {
                let mut sql =
                    "id IN (SELECT product_id FROM product_numeric_attributes WHERE name = ?".to_string();
                let mut values = vec![name.clone()];
                if let Some(min) = min {
                    sql.push_str(" AND value >= ?");
                    values.push(min.to_string());
                }
                if let Some(max) = max {
                    sql.push_str(" AND value <= ?");
                    values.push(max.to_string());
                }
                sql.push(')');
                (sql, values)
            }
            Predicate::Certified => ("is_cpo = 1".to_string(), vec![]),
            Predicate::IdIn { ids } => {
                if ids.is_empty() {
                    return ("1=0".to_string(), vec![]);
                }
                let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                (
                    format!("id IN ({})", placeholders),
                    ids.iter().map(|id| id.as_str().to_string()).collect(),
                )
            }
        }
    }
}

impl FilterExpr {
    /// Build the full WHERE clause: every predicate ANDed.
    pub fn to_where_clause(&self) -> (String, Vec<String>) {
        if self.is_empty() {
            return ("1=1".to_string(), vec![]);
        }

        let mut clauses = Vec::with_capacity(self.clauses().len());
        let mut all_values = Vec::new();

        for clause in self.clauses() {
            let (sql, values) = clause.predicate.to_sql();
            clauses.push(format!("({})", sql));
            all_values.extend(values);
        }

        (clauses.join(" AND "), all_values)
    }
}
