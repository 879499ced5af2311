//! Location decoding command.

use anyhow::Result;
use serde::Serialize;
use turbo_facets::codec::ListingState;

use super::DecodeArgs;
use crate::context::{parse_location, Context};

#[derive(Serialize)]
struct DecodeReport<'a> {
    state: &'a ListingState,
    canonical: String,
    active_filters: usize,
}

/// Run the decode command.
pub async fn run(args: DecodeArgs, ctx: &Context) -> Result<()> {
    // Without a snapshot the codec keeps attribute slugs as names.
    let snapshot = match args.snapshot.as_deref().or(ctx.config.snapshot.as_deref()) {
        Some(path) => Some(ctx.load_snapshot(Some(path))?),
        None => None,
    };
    let codec = ctx.codec(snapshot.as_deref())?;
    let location = parse_location(&args.location)?;
    let state = codec.decode(&location);
    let canonical = codec.encode(&state).to_string();

    if ctx.output.is_json() {
        ctx.output.json(&DecodeReport {
            state: &state,
            canonical,
            active_filters: state.filters.active_count(),
        });
        return Ok(());
    }

    let filters = &state.filters;
    ctx.output.header(&location.to_string());
    ctx.output.kv("category", filters.category.as_deref().unwrap_or("(all)"));
    if !filters.search.is_empty() {
        ctx.output.kv("search", &filters.search);
    }
    if !filters.brands.is_empty() {
        ctx.output.kv("brands", &filters.brands.join(", "));
    }
    if filters.has_price_constraint() {
        let max = filters
            .max_price
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unbounded".to_string());
        ctx.output.kv("price", &format!("{} to {}", filters.min_price, max));
    }
    for custom in &filters.custom_filters {
        ctx.output.kv(&custom.name, &custom.value);
    }
    for range in &filters.range_filters {
        ctx.output.kv(&range.name, &format!("{:?} to {:?}", range.min, range.max));
    }
    if filters.is_cpo {
        ctx.output.kv("certified", "yes");
    }
    ctx.output.kv("page", &state.page.to_string());
    ctx.output.kv("sort", state.sort.display_name());

    if canonical != location.to_string() {
        ctx.output.info(&format!("Canonical form: {}", canonical));
    } else {
        ctx.output.success("Location is canonical");
    }

    Ok(())
}
