//! CLI command implementations.

pub mod config;
pub mod count;
pub mod decode;
pub mod list;
pub mod navigate;
pub mod sql;

use clap::{Args, Subcommand};

/// Arguments for the count command.
#[derive(Args)]
pub struct CountArgs {
    /// Location to decode (path and query, or absolute URL).
    #[arg(default_value = "/")]
    pub location: String,

    /// Snapshot JSON file (default: `snapshot` from config).
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Product ids returned by the search backend, in relevance order.
    #[arg(long, value_delimiter = ',')]
    pub hits: Vec<String>,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Location to decode (path and query, or absolute URL).
    #[arg(default_value = "/")]
    pub location: String,

    /// Snapshot JSON file (default: `snapshot` from config).
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Product ids returned by the search backend, in relevance order.
    #[arg(long, value_delimiter = ',')]
    pub hits: Vec<String>,
}

/// Arguments for the decode command.
#[derive(Args)]
pub struct DecodeArgs {
    /// Location to decode (path and query, or absolute URL).
    pub location: String,

    /// Snapshot used to map attribute slugs back to names.
    #[arg(short, long)]
    pub snapshot: Option<String>,
}

/// Arguments for the sql command.
#[derive(Args)]
pub struct SqlArgs {
    /// Location to decode (path and query, or absolute URL).
    pub location: String,

    /// Snapshot used to map attribute slugs back to names.
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Product ids returned by the search backend, in relevance order.
    #[arg(long, value_delimiter = ',')]
    pub hits: Vec<String>,

    /// Print only the count query.
    #[arg(long)]
    pub count: bool,
}

/// Arguments for the navigate command.
#[derive(Args)]
pub struct NavigateArgs {
    /// Starting location.
    pub location: String,

    /// Snapshot JSON file (default: `snapshot` from config).
    #[arg(short, long)]
    pub snapshot: Option<String>,

    #[command(subcommand)]
    pub action: NavigateAction,

    /// Milliseconds before the address bar reflects the navigation.
    #[arg(long, default_value = "50")]
    pub resolve_after: u64,

    /// Never resolve; only the timeout can end the navigation.
    #[arg(long)]
    pub never_resolve: bool,
}

#[derive(Subcommand, Clone)]
pub enum NavigateAction {
    /// Select a category ("" for all categories).
    Category { slug: String },
    /// Go to a page.
    Page { page: u32 },
    /// Change the sort order.
    Sort { key: String },
    /// Toggle a brand in the panel and apply.
    Brand { slug: String },
    /// Clear every filter except the category.
    ClearAll,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Scorer output from `--hits`, if any were given.
pub(crate) fn search_hits(ids: &[String]) -> Option<turbo_facets::filter::SearchHits> {
    let ids: Vec<turbo_facets::ProductId> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(turbo_facets::ProductId::from)
        .collect();
    (!ids.is_empty()).then(|| turbo_facets::filter::SearchHits::new(ids))
}
