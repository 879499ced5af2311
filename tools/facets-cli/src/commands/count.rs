//! Facet count command.

use anyhow::Result;
use serde::Serialize;
use turbo_facets::codec::{slugify, ListingState};
use turbo_facets::facets::{
    attribute_groups, brand_group, category_group, price_slider, range_slider, FacetEngine,
    FacetGroup, FacetResult, SliderState,
};
use turbo_facets::money::Money;

use super::{search_hits, CountArgs};
use crate::context::{parse_location, Context};
use crate::output::facet_label;

#[derive(Serialize)]
struct CountReport<'a> {
    state: &'a ListingState,
    result: &'a FacetResult,
    groups: Vec<FacetGroup>,
    price: SliderState,
    ranges: Vec<(String, SliderState)>,
}

/// Run the count command.
pub async fn run(args: CountArgs, ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_snapshot(args.snapshot.as_deref())?;
    let codec = ctx.codec(Some(snapshot.as_ref()))?;
    let location = parse_location(&args.location)?;
    let state = codec.decode(&location);
    let hits = search_hits(&args.hits);

    let engine = FacetEngine::new(&snapshot).with_search(hits.as_ref());
    let result = engine.compute(&state.filters);
    let unfiltered = engine.compute(&state.filters.cleared().with_category(None));

    let mut groups = vec![
        category_group(&snapshot, &result, &state.filters),
        brand_group(&snapshot, &result, &state.filters),
    ];
    groups.extend(attribute_groups(&result, &state.filters, slugify));

    let price = price_slider(&snapshot, &result, &state.filters);
    let ranges: Vec<(String, SliderState)> = result
        .range_bounds
        .keys()
        .chain(unfiltered.range_bounds.keys())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(|name| (name.clone(), range_slider(name, &unfiltered, &result, &state.filters)))
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&CountReport {
            state: &state,
            result: &result,
            groups,
            price,
            ranges,
        });
        return Ok(());
    }

    ctx.output.header(&format!("Facets for {}", location));
    ctx.output.kv("matching", &result.match_count.to_string());
    ctx.output.kv("all products", &result.all_products_count.to_string());
    if result.is_empty() {
        ctx.output.warn("No products match these filters");
    }

    for group in groups.iter().filter(|g| !g.is_empty()) {
        ctx.output.info("");
        ctx.output.info(&format!("{} [{}]", group.name, group.field));
        for value in &group.values {
            ctx.output
                .list_item(&facet_label(&value.label, value.count, value.selected), value.depth);
        }
    }

    ctx.output.info("");
    ctx.output.info("Price");
    let currency = snapshot.currency;
    match price {
        SliderState::Enabled {
            floor,
            ceiling,
            low,
            high,
        } => {
            let money = |minor: f64| Money::new(minor.round() as i64, currency).display();
            ctx.output.kv("bounds", &format!("{} to {}", money(floor), money(ceiling)));
            ctx.output.kv("selected", &format!("{} to {}", money(low), money(high)));
        }
        SliderState::Disabled { .. } => ctx.output.kv("slider", "disabled"),
    }

    for (name, slider) in &ranges {
        ctx.output.info("");
        ctx.output.info(name);
        match slider {
            SliderState::Enabled {
                floor,
                ceiling,
                low,
                high,
            } => {
                ctx.output.kv("bounds", &format!("{} to {}", floor, ceiling));
                ctx.output.kv("selected", &format!("{} to {}", low, high));
            }
            SliderState::Disabled {
                active_min,
                active_max,
            } => {
                ctx.output.kv("slider", "disabled");
                if active_min.is_some() || active_max.is_some() {
                    ctx.output.kv("active", &format!("{:?} to {:?}", active_min, active_max));
                }
            }
        }
    }

    Ok(())
}
