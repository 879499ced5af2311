//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use turbo_facets::catalog::ListingSnapshot;
use turbo_facets::codec::{Location, QueryCodec};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["facets.toml", ".facets.toml", "facets.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file the configuration came from, if any.
    pub config_file: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_file) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(path) = &config_file {
            output.debug(&format!("Using config: {}", path.display()));
        }

        Ok(Self {
            config,
            output,
            cwd,
            config_file,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => tracing::warn!(path = %config_path.display(), "skipping config: {:#}", e),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Load the snapshot named on the command line, or the configured one.
    pub fn load_snapshot(&self, path: Option<&str>) -> Result<Arc<ListingSnapshot>> {
        let Some(path) = path.or(self.config.snapshot.as_deref()) else {
            bail!("No snapshot given. Pass a snapshot file or set `snapshot` in facets.toml.");
        };
        let path = self.resolve_path(path);
        let payload = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let snapshot = ListingSnapshot::from_json(&payload)
            .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;

        self.output.debug(&format!(
            "Loaded {} products, {} categories, {} brands",
            snapshot.len(),
            snapshot.categories.len(),
            snapshot.brands.len()
        ));
        Ok(Arc::new(snapshot))
    }

    /// Codec for the configured route, aware of the snapshot's attributes.
    pub fn codec(&self, snapshot: Option<&ListingSnapshot>) -> Result<QueryCodec> {
        self.config
            .codec
            .validate()
            .context("Invalid [codec] configuration")?;
        let config = self.config.codec.clone();
        Ok(match snapshot {
            Some(snapshot) => QueryCodec::for_snapshot(config, snapshot),
            None => QueryCodec::new(config),
        })
    }
}

/// Accept either a relative location (`/category/cars?brands=volvo`) or an
/// absolute URL.
pub fn parse_location(input: &str) -> Result<Location> {
    if input.starts_with('/') || input.starts_with('?') {
        let location = Location::parse(input);
        return Ok(if location.path.is_empty() {
            Location::new("/", location.query)
        } else {
            location
        });
    }

    let url = url::Url::parse(input).map_err(|e| anyhow!("Invalid location {:?}: {}", input, e))?;
    Ok(Location::new(url.path(), url.query().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative_location() {
        let location = parse_location("/category/cars?brands=volvo").unwrap();
        assert_eq!(location.path, "/category/cars");
        assert_eq!(location.query, "brands=volvo");

        let query_only = parse_location("?page=2").unwrap();
        assert_eq!(query_only.path, "/");
        assert_eq!(query_only.query, "page=2");
    }

    #[test]
    fn test_parse_absolute_url() {
        let location = parse_location("https://shop.example/brands/volvo?category=cars#top").unwrap();
        assert_eq!(location.path, "/brands/volvo");
        assert_eq!(location.query, "category=cars");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_location("not a url").is_err());
    }
}
