//! In-memory listing command.

use anyhow::Result;
use serde::Serialize;
use turbo_facets::listing::{ListingPage, Pagination};
use turbo_facets::money::Money;

use super::{search_hits, ListArgs};
use crate::context::{parse_location, Context};

#[derive(Serialize)]
struct ListReport<'a> {
    location: String,
    sort: &'static str,
    page: ListingPage<'a>,
}

/// Why a page has no rows, if it has none.
fn empty_page_message(pagination: &Pagination) -> Option<String> {
    if pagination.total == 0 {
        Some("No products match these filters".to_string())
    } else if pagination.is_out_of_range() {
        Some(format!(
            "Page {} is past the last page ({}); {} products match",
            pagination.page, pagination.total_pages, pagination.total
        ))
    } else {
        None
    }
}

/// Run the list command.
pub async fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_snapshot(args.snapshot.as_deref())?;
    let codec = ctx.codec(Some(snapshot.as_ref()))?;
    let location = parse_location(&args.location)?;
    let state = codec.decode(&location);
    let hits = search_hits(&args.hits);

    let query = state.to_query(hits.as_ref(), codec.config().per_page);
    let page = query.execute(&snapshot.records);

    if ctx.output.is_json() {
        ctx.output.json(&ListReport {
            location: codec.encode(&state).to_string(),
            sort: state.sort.as_key(),
            page,
        });
        return Ok(());
    }

    let pagination = page.pagination;
    ctx.output.header(&format!(
        "{} - {}",
        codec.encode(&state),
        state.sort.display_name()
    ));

    if let Some(message) = empty_page_message(&pagination) {
        ctx.output.warn(&message);
        return Ok(());
    }

    ctx.output.info(&format!(
        "Showing {}-{} of {}",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total
    ));

    let widths = [16, 14, 12, 24];
    ctx.output.table_row(&["ID", "PRICE", "BRAND", "CATEGORIES"], &widths);
    for record in &page.items {
        let price = record
            .price
            .map(|minor| Money::new(minor, snapshot.currency).display())
            .unwrap_or_else(|| "-".to_string());
        let categories = record.categories.join(", ");
        ctx.output.table_row(
            &[
                record.id.as_str(),
                &price,
                record.brand.as_deref().unwrap_or("-"),
                &categories,
            ],
            &widths,
        );
    }

    let pages: Vec<String> = pagination
        .page_numbers(7)
        .into_iter()
        .map(|n| {
            if n == pagination.page {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    ctx.output.kv("pages", &pages.join(" "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_messages() {
        assert!(empty_page_message(&Pagination::new(1, 10, 0))
            .unwrap()
            .starts_with("No products"));
        assert_eq!(
            empty_page_message(&Pagination::new(9, 10, 45)).as_deref(),
            Some("Page 9 is past the last page (5); 45 products match")
        );
        assert_eq!(empty_page_message(&Pagination::new(5, 10, 45)), None);
    }
}
