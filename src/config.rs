//! Graph and persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Graph configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Graph name, also the default save directory name
    pub name: String,
    /// Weight given to edges inserted without a `weight` label
    pub default_weight: f64,
    /// Largest matrix dimension (`max_id + 1`) accepted by adjacency conversion
    pub max_adjacency_dimension: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "noname_graph".to_string(),
            default_weight: 1.0,
            max_adjacency_dimension: 4096,
        }
    }
}

impl GraphConfig {
    pub fn new(name: impl Into<String>, default_weight: f64) -> Self {
        Self {
            name: name.into(),
            default_weight,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Where and under which directory name a graph is saved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOptions {
    /// Parent directory (None = current directory)
    pub directory: Option<PathBuf>,
    /// Directory name (None = graph name)
    pub name: Option<String>,
}

impl SaveOptions {
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.name, "noname_graph");
        assert_eq!(config.default_weight, 1.0);
        assert_eq!(config.max_adjacency_dimension, 4096);
    }

    #[test]
    fn test_config_from_json() {
        let config = GraphConfig::from_json(r#"{"name": "roads", "default_weight": 2.5}"#).unwrap();
        assert_eq!(config.name, "roads");
        assert_eq!(config.default_weight, 2.5);
        assert_eq!(config.max_adjacency_dimension, 4096);

        assert!(GraphConfig::from_json("{\"default_weight\": \"heavy\"}").is_err());
    }

    #[test]
    fn test_save_options() {
        let options = SaveOptions::in_directory("/tmp/graphs").with_name("backup");
        assert_eq!(options.directory, Some(PathBuf::from("/tmp/graphs")));
        assert_eq!(options.name.as_deref(), Some("backup"));
    }
}
