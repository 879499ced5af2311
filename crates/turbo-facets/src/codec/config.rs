//! Codec configuration.

use crate::error::FacetError;
use crate::listing::SortOption;
use serde::{Deserialize, Serialize};

/// Where the category lives in the address bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CategoryRouting {
    /// Category-listing routes: `{prefix}/cars/suv`.
    PathSegment {
        #[serde(default = "default_category_prefix")]
        prefix: String,
    },
    /// Brand-listing routes: fixed path, `category=cars/suv` in the query.
    QueryParam { path: String },
}

impl Default for CategoryRouting {
    fn default() -> Self {
        CategoryRouting::PathSegment {
            prefix: default_category_prefix(),
        }
    }
}

fn default_category_prefix() -> String {
    "/category".to_string()
}

fn default_per_page() -> u32 {
    24
}

/// Per-route codec settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Category routing convention.
    #[serde(default)]
    pub routing: CategoryRouting,

    /// Sort omitted from the query string.
    #[serde(default)]
    pub default_sort: SortOption,

    /// Listing page size.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            routing: CategoryRouting::default(),
            default_sort: SortOption::default(),
            per_page: default_per_page(),
        }
    }
}

impl CodecConfig {
    /// Category-listing routes under `prefix`.
    pub fn category_route(prefix: impl Into<String>) -> Self {
        Self {
            routing: CategoryRouting::PathSegment {
                prefix: prefix.into(),
            },
            ..Self::default()
        }
    }

    /// Brand-listing (or other fixed) route at `path`.
    pub fn query_route(path: impl Into<String>) -> Self {
        Self {
            routing: CategoryRouting::QueryParam { path: path.into() },
            ..Self::default()
        }
    }

    pub fn with_default_sort(mut self, sort: SortOption) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn validate(&self) -> Result<(), FacetError> {
        let path = match &self.routing {
            CategoryRouting::PathSegment { prefix } => prefix,
            CategoryRouting::QueryParam { path } => path,
        };
        if !path.starts_with('/') {
            return Err(FacetError::InvalidConfig(format!(
                "route path must start with '/': {:?}",
                path
            )));
        }
        if path.contains('?') || path.contains('#') {
            return Err(FacetError::InvalidConfig(format!(
                "route path must not carry a query or fragment: {:?}",
                path
            )));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(FacetError::InvalidConfig(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.routing, CategoryRouting::default());
        assert_eq!(config.default_sort, SortOption::Featured);
        assert_eq!(config.per_page, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_query_route() {
        let config: CodecConfig = serde_json::from_str(
            r#"{"routing": {"mode": "query_param", "path": "/brands/volvo"}, "default_sort": "price_asc"}"#,
        )
        .unwrap();
        assert_eq!(config.routing, CategoryRouting::QueryParam { path: "/brands/volvo".into() });
        assert_eq!(config.default_sort, SortOption::PriceAsc);
        assert_eq!(config.per_page, 24);
    }

    #[test]
    fn test_validate_rejects_bad_paths() {
        assert!(CodecConfig::category_route("category").validate().is_err());
        assert!(CodecConfig::query_route("/brands?x=1").validate().is_err());

        let mut config = CodecConfig::default();
        config.per_page = 0;
        assert!(config.validate().is_err());
    }
}
