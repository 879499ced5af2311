//! Address-bar location.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path and query string of the current address bar. The query is stored
/// without its leading `?`; any `#fragment` is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Split a relative URL such as `/category/cars?brands=volvo`.
    pub fn parse(href: &str) -> Self {
        let href = href.split('#').next().unwrap_or_default();
        match href.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(href, ""),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let loc = Location::parse("/category/cars?brands=volvo#top");
        assert_eq!(loc.path, "/category/cars");
        assert_eq!(loc.query, "brands=volvo");
        assert_eq!(loc.to_string(), "/category/cars?brands=volvo");

        let bare = Location::parse("/brands/volvo");
        assert_eq!(bare.query, "");
        assert_eq!(bare.to_string(), "/brands/volvo");
    }
}
