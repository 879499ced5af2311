//! SQL rendering command.

use anyhow::Result;
use serde::Serialize;

use super::{search_hits, SqlArgs};
use crate::context::{parse_location, Context};

#[derive(Serialize)]
struct SqlReport {
    sql: String,
    params: Vec<String>,
    count_sql: String,
    count_params: Vec<String>,
}

/// Run the sql command.
pub async fn run(args: SqlArgs, ctx: &Context) -> Result<()> {
    let snapshot = match args.snapshot.as_deref().or(ctx.config.snapshot.as_deref()) {
        Some(path) => Some(ctx.load_snapshot(Some(path))?),
        None => None,
    };
    let codec = ctx.codec(snapshot.as_deref())?;
    let state = codec.decode(&parse_location(&args.location)?);
    let hits = search_hits(&args.hits);

    if !state.filters.search.is_empty() && hits.is_none() {
        ctx.output
            .warn("Search text given without --hits; the search clause is left to the backend");
    }

    let query = state.to_query(hits.as_ref(), codec.config().per_page);
    let (sql, params) = query.build_sql();
    let (count_sql, count_params) = query.build_count_sql();

    if ctx.output.is_json() {
        ctx.output.json(&SqlReport {
            sql,
            params,
            count_sql,
            count_params,
        });
        return Ok(());
    }

    let (sql, params) = if args.count {
        (count_sql, count_params)
    } else {
        (sql, params)
    };
    println!("{};", sql);
    for (i, param) in params.iter().enumerate() {
        ctx.output.kv(&format!("?{}", i + 1), param);
    }

    Ok(())
}
