// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph construction settings.

use crate::container::ContainerKind;
use serde::{Deserialize, Serialize};

/// Error loading or saving a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// RON parse error
    #[error("Invalid configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON write error
    #[error("Configuration serialization error: {0}")]
    Write(#[from] ron::Error),
}

/// Settings chosen once when a [`Graph`](crate::Graph) is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Graph name, used in log output
    pub name: String,
    /// Backend of node in/out edge lists
    pub adjacency: ContainerKind,
    /// Backend of group member sets
    pub group_members: ContainerKind,
    /// Install the adjacent edges behaviour on groups created by the graph
    pub group_adjacency: bool,
}

impl GraphConfig {
    /// Create the default configuration with a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from RON; missing fields take their default value
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Write this configuration as pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            adjacency: ContainerKind::List,
            group_members: ContainerKind::Set,
            group_adjacency: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.name, "Untitled");
        assert_eq!(config.adjacency, ContainerKind::List);
        assert!(config.group_adjacency);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = GraphConfig {
            adjacency: ContainerKind::Set,
            ..GraphConfig::named("Topology")
        };
        let ron_str = config.to_ron().unwrap();
        let loaded = GraphConfig::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let loaded = GraphConfig::from_ron("(name: \"partial\", group_adjacency: false)").unwrap();
        assert_eq!(loaded.name, "partial");
        assert!(!loaded.group_adjacency);
        assert_eq!(loaded.group_members, ContainerKind::Set);
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            GraphConfig::from_ron("(adjacency: Tree)"),
            Err(ConfigError::Parse(_))
        ));
    }
}
