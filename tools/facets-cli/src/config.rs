//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_facets::codec::CodecConfig;
use turbo_navigation::NavigationConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default snapshot file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,

    /// Address-bar codec settings.
    #[serde(default)]
    pub codec: CodecConfig,

    /// Navigation timing settings.
    #[serde(default)]
    pub navigation: NavigationConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Generate a default facets.toml config file.
pub fn generate_default_config() -> String {
    r#"# Listing facets configuration

# snapshot = "snapshot.json"

[codec]
default_sort = "featured"
per_page = 24

[codec.routing]
mode = "path_segment"
prefix = "/category"

# Brand-listing routes keep the category in the query string:
# [codec.routing]
# mode = "query_param"
# path = "/brands/volvo"

[navigation]
skeleton_delay_ms = 100
# navigation_timeout_ms = 5000
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_facets::codec::CategoryRouting;
    use turbo_facets::listing::SortOption;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.codec, CodecConfig::default());
        assert_eq!(config.navigation, NavigationConfig::default());
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: CliConfig = toml::from_str(
            r#"
            snapshot = "cars.json"

            [codec]
            default_sort = "newest"

            [codec.routing]
            mode = "query_param"
            path = "/brands/audi"
            "#,
        )
        .unwrap();
        assert_eq!(config.snapshot.as_deref(), Some("cars.json"));
        assert_eq!(config.codec.default_sort, SortOption::Newest);
        assert_eq!(
            config.codec.routing,
            CategoryRouting::QueryParam { path: "/brands/audi".into() }
        );
        assert_eq!(config.navigation.skeleton_delay_ms, 100);
    }
}
