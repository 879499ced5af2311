//! Simulated navigation command.
//!
//! Runs one filter action through a `ListingSession` against the real clock
//! and prints how the phase and loading indicator evolve until the address
//! bar catches up (or the navigation times out).

use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::time::{sleep, Instant};
use turbo_facets::listing::SortOption;
use turbo_navigation::controller::{DraftEdit, FilterEvent, FilterPhase};
use turbo_navigation::ListingSession;

use super::{NavigateAction, NavigateArgs};
use crate::context::{parse_location, Context};
use crate::output::loading_badge;

const STEP: Duration = Duration::from_millis(10);

#[derive(Serialize)]
struct Frame {
    at_ms: u128,
    phase: FilterPhase,
    is_pending: bool,
    show_skeleton: bool,
}

#[derive(Serialize)]
struct NavigateReport {
    start: String,
    pushed: Vec<String>,
    outcome: &'static str,
    location: String,
    match_count: usize,
    timeline: Vec<Frame>,
}

fn events(action: &NavigateAction) -> Result<Vec<FilterEvent>> {
    Ok(match action {
        NavigateAction::Category { slug } => {
            let slug = slug.trim();
            vec![FilterEvent::SelectCategory((!slug.is_empty()).then(|| slug.to_string()))]
        }
        NavigateAction::Page { page } => vec![FilterEvent::SetPage(*page)],
        NavigateAction::Sort { key } => match SortOption::from_key(key) {
            Some(sort) => vec![FilterEvent::SetSort(sort)],
            None => bail!("Unknown sort key: {}", key),
        },
        NavigateAction::Brand { slug } => vec![
            FilterEvent::EditDraft(DraftEdit::ToggleBrand(slug.clone())),
            FilterEvent::Apply,
        ],
        NavigateAction::ClearAll => vec![FilterEvent::ClearAll],
    })
}

/// Run the navigate command.
pub async fn run(args: NavigateArgs, ctx: &Context) -> Result<()> {
    let navigation = &ctx.config.navigation;
    if args.never_resolve && navigation.navigation_timeout_ms.is_none() {
        bail!("--never-resolve needs `navigation_timeout_ms` in the config, or nothing ends the navigation");
    }

    let snapshot = ctx.load_snapshot(args.snapshot.as_deref())?;
    let start = parse_location(&args.location)?;
    let mut session = ListingSession::new(snapshot, ctx.config.codec.clone(), navigation, &start)?;
    let start = session.codec().encode(session.controller().committed());

    let mut pushed = Vec::new();
    for event in events(&args.action)? {
        ctx.output.debug(&format!("dispatch {}", event.name()));
        pushed.extend(session.dispatch(event));
    }

    let began = Instant::now();
    let mut timeline = Vec::new();
    let record = |session: &ListingSession, timeline: &mut Vec<Frame>| {
        let loading = session.loading();
        let frame = Frame {
            at_ms: began.elapsed().as_millis(),
            phase: session.phase(),
            is_pending: loading.is_pending,
            show_skeleton: loading.show_skeleton,
        };
        let changed = timeline.last().map_or(true, |last: &Frame| {
            last.phase != frame.phase
                || last.is_pending != frame.is_pending
                || last.show_skeleton != frame.show_skeleton
        });
        if changed {
            ctx.output.kv(
                &format!("{:>5}ms", frame.at_ms),
                &format!(
                    "{:<12} {}",
                    frame.phase.as_str(),
                    loading_badge(frame.is_pending, frame.show_skeleton)
                ),
            );
            timeline.push(frame);
        }
    };

    ctx.output.header(&format!("Navigating from {}", start));
    record(&session, &mut timeline);

    let outcome = match pushed.last().cloned() {
        None => {
            ctx.output.info("Already there; nothing to navigate");
            "noop"
        }
        Some(target) => {
            ctx.output.info(&format!("Pushed {}", target));
            ctx.output.kv(
                "showing",
                session.displayed_filters().category.as_deref().unwrap_or("(all)"),
            );

            let resolve_after = (!args.never_resolve).then(|| Duration::from_millis(args.resolve_after));
            loop {
                sleep(STEP).await;
                if resolve_after.is_some_and(|after| began.elapsed() >= after) {
                    session.location_changed(&target);
                    record(&session, &mut timeline);
                    session.settled();
                    record(&session, &mut timeline);
                    break "resolved";
                }

                session.tick();
                record(&session, &mut timeline);
                if session.phase() == FilterPhase::Idle {
                    ctx.output.warn("Navigation timed out; rolled back to the previous filters");
                    break "abandoned";
                }
            }
        }
    };

    let location = session.codec().encode(session.controller().committed()).to_string();
    let match_count = session.facets().match_count;

    if ctx.output.is_json() {
        ctx.output.json(&NavigateReport {
            start: start.to_string(),
            pushed: pushed.iter().map(ToString::to_string).collect(),
            outcome,
            location,
            match_count,
            timeline,
        });
        return Ok(());
    }

    if outcome == "resolved" {
        ctx.output.success(&format!("Settled at {} ({} products)", location, match_count));
    } else {
        ctx.output.kv("location", &location);
        ctx.output.kv("products", &match_count.to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_category_means_all_categories() {
        let events = events(&NavigateAction::Category { slug: " ".into() }).unwrap();
        assert_eq!(events, vec![FilterEvent::SelectCategory(None)]);
    }

    #[test]
    fn test_brand_is_applied_through_the_panel() {
        let events = events(&NavigateAction::Brand { slug: "volvo".into() }).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], FilterEvent::Apply);
    }

    #[test]
    fn test_unknown_sort_is_rejected() {
        assert!(events(&NavigateAction::Sort { key: "cheapest".into() }).is_err());
        assert_eq!(
            events(&NavigateAction::Sort { key: "price_asc".into() }).unwrap(),
            vec![FilterEvent::SetSort(SortOption::PriceAsc)]
        );
    }
}
