//! Navigation configuration.

use std::time::Duration;

use crate::controller::NavigationTimeout;
use crate::error::NavigationError;
use serde::{Deserialize, Serialize};

fn default_skeleton_delay_ms() -> u64 {
    100
}

/// Timing settings for one listing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// How long a navigation may stay pending before the skeleton shows.
    #[serde(default = "default_skeleton_delay_ms")]
    pub skeleton_delay_ms: u64,

    /// Roll back the optimistic overlay after this long. `None` waits for
    /// the address bar indefinitely.
    #[serde(default)]
    pub navigation_timeout_ms: Option<u64>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            skeleton_delay_ms: default_skeleton_delay_ms(),
            navigation_timeout_ms: None,
        }
    }
}

impl NavigationConfig {
    pub fn skeleton_delay(&self) -> Duration {
        Duration::from_millis(self.skeleton_delay_ms)
    }

    pub fn timeout(&self) -> NavigationTimeout {
        match self.navigation_timeout_ms {
            Some(ms) => NavigationTimeout::RollbackAfter(Duration::from_millis(ms)),
            None => NavigationTimeout::Never,
        }
    }

    pub fn validate(&self) -> Result<(), NavigationError> {
        if let Some(timeout) = self.navigation_timeout_ms {
            if timeout <= self.skeleton_delay_ms {
                return Err(NavigationError::InvalidConfig(format!(
                    "navigation_timeout_ms ({}) must exceed skeleton_delay_ms ({})",
                    timeout, self.skeleton_delay_ms
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: NavigationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, NavigationConfig::default());
        assert_eq!(config.skeleton_delay(), Duration::from_millis(100));
        assert_eq!(config.timeout(), NavigationTimeout::Never);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_must_exceed_delay() {
        let config = NavigationConfig {
            skeleton_delay_ms: 100,
            navigation_timeout_ms: Some(50),
        };
        assert!(config.validate().is_err());

        let config = NavigationConfig {
            navigation_timeout_ms: Some(5000),
            ..NavigationConfig::default()
        };
        assert_eq!(
            config.timeout(),
            NavigationTimeout::RollbackAfter(Duration::from_secs(5))
        );
    }
}
