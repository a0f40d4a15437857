//! Tunables for layout, edge styling and recommendations, loaded from an
//! optional JSON file. Every field falls back to its default.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::LayoutConfig;
use crate::recommend::DEFAULT_LIMIT;
use crate::view::EdgeStylePolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub edges: EdgeStylePolicy,
    pub recommend: RecommendConfig,
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.edges.validate()?;
        if self.recommend.limit == 0 {
            return Err(Error::Config("recommend.limit must be at least 1".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.recommend.limit, 10);
        assert_eq!(config.layout.column_spacing, 400.0);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"layout": {"ring_step": 12}, "recommend": {"limit": 3}}"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.layout.ring_step, 12.0);
        assert_eq!(config.layout.ring_radius, 100.0);
        assert_eq!(config.recommend.limit, 3);
        assert_eq!(config.edges, EdgeStylePolicy::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"recommend": {"limit": 0}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"edges": {"dimmed_opacity": 2.0}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json("[1, 2]"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(Config::load(Some(&path)), Err(Error::Io(_))));
    }
}
