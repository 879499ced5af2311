//! Configuration command.

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init { force } => init(ctx, force),
        ConfigCommand::Validate => validate(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let config = &ctx.config;
    ctx.output.header("Configuration");
    match &ctx.config_file {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output
        .kv("snapshot", config.snapshot.as_deref().unwrap_or("(none)"));

    ctx.output.header("Codec");
    ctx.output.kv("routing", &format!("{:?}", config.codec.routing));
    ctx.output.kv("default_sort", config.codec.default_sort.as_key());
    ctx.output.kv("per_page", &config.codec.per_page.to_string());

    ctx.output.header("Navigation");
    ctx.output.kv(
        "skeleton_delay",
        &format!("{}ms", config.navigation.skeleton_delay_ms),
    );
    ctx.output.kv(
        "timeout",
        &config
            .navigation
            .navigation_timeout_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "never".to_string()),
    );

    Ok(())
}

fn init(ctx: &Context, force: bool) -> Result<()> {
    let existing = CONFIG_NAMES
        .iter()
        .map(|name| ctx.cwd.join(name))
        .find(|path| path.exists());

    if let Some(path) = existing {
        if !force {
            bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }
        ctx.output.warn(&format!("Overwriting {}", path.display()));
    }

    let path = ctx.cwd.join(CONFIG_NAMES[0]);
    std::fs::write(&path, generate_default_config())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    ctx.output.success(&format!("Created {}", path.display()));

    Ok(())
}

fn validate(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    config
        .codec
        .validate()
        .context("Invalid [codec] configuration")?;
    config
        .navigation
        .validate()
        .context("Invalid [navigation] configuration")?;

    if let Some(snapshot) = config.snapshot.as_deref() {
        ctx.load_snapshot(Some(snapshot))?;
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}
