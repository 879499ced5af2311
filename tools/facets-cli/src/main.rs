//! Facets CLI - Command line tool for TurboCommerce listing facets.
//!
//! Commands:
//! - `facets count` - Compute facet counts for a snapshot and location
//! - `facets list` - Run the listing query in memory
//! - `facets decode` - Decode a location into listing state
//! - `facets sql` - Render the listing query as SQL
//! - `facets navigate` - Simulate one navigation cycle with loading signals
//! - `facets config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, CountArgs, DecodeArgs, ListArgs, NavigateArgs, SqlArgs};

/// Facets CLI - Inspect listing facets, query strings and navigation
#[derive(Parser)]
#[command(name = "facets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute facet counts
    Count(CountArgs),

    /// List matching products
    List(ListArgs),

    /// Decode a location into listing state
    Decode(DecodeArgs),

    /// Render the listing query as SQL
    Sql(SqlArgs),

    /// Simulate a navigation and its loading signals
    Navigate(NavigateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Count(args) => commands::count::run(args, &ctx).await,
        Commands::List(args) => commands::list::run(args, &ctx).await,
        Commands::Decode(args) => commands::decode::run(args, &ctx).await,
        Commands::Sql(args) => commands::sql::run(args, &ctx).await,
        Commands::Navigate(args) => commands::navigate::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
