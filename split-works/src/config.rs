//! split-works configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use work_splitter::SegmenterOptions;
use work_splitter::segmenter::{DEFAULT_FLUSH_THRESHOLD, DEFAULT_PREAMBLE_LIMIT};

/// Output directory used when neither the flag nor the config names one.
pub const DEFAULT_OUTPUT_DIR: &str = "shakespeare_plays";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitWorksConfig {
    /// Default output directory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Catalog TOML to use instead of the built-in PG100 catalog
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Body lines buffered before a flush
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,

    /// Lines searched for the start of content after a title
    #[serde(default = "default_preamble_limit")]
    pub preamble_limit: usize,
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

fn default_preamble_limit() -> usize {
    DEFAULT_PREAMBLE_LIMIT
}

impl Default for SplitWorksConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            catalog: None,
            flush_threshold: default_flush_threshold(),
            preamble_limit: default_preamble_limit(),
        }
    }
}

impl SplitWorksConfig {
    /// Get the config file path: ~/.config/cli-programs/split-works.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("cli-programs")
            .join("split-works.toml"))
    }

    /// Load config from the default location, returning default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Output directory, falling back to the built-in default.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn segmenter_options(&self) -> SegmenterOptions {
        SegmenterOptions {
            flush_threshold: self.flush_threshold,
            preamble_limit: self.preamble_limit,
            ..SegmenterOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SplitWorksConfig::default();
        assert!(config.output_dir.is_none());
        assert!(config.catalog.is_none());
        assert_eq!(config.flush_threshold, 1000);
        assert_eq!(config.preamble_limit, 1000);
        assert_eq!(config.output_dir(), PathBuf::from("shakespeare_plays"));
    }

    #[test]
    fn test_config_path() {
        let path = SplitWorksConfig::config_path().unwrap();
        assert!(path.ends_with("cli-programs/split-works.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
output_dir = "/tmp/plays"
catalog = "/etc/catalog.toml"
flush_threshold = 50
preamble_limit = 200
"#;
        let config: SplitWorksConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/plays"));
        assert_eq!(config.catalog, Some(PathBuf::from("/etc/catalog.toml")));

        let options = config.segmenter_options();
        assert_eq!(options.flush_threshold, 50);
        assert_eq!(options.preamble_limit, 200);
        assert_eq!(options.header_marker, "Contents");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: SplitWorksConfig = toml::from_str("").unwrap();
        assert_eq!(config, SplitWorksConfig::default());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let temp = TempDir::new().unwrap();
        let config = SplitWorksConfig::load_from(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config, SplitWorksConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("split-works.toml");
        let config = SplitWorksConfig {
            output_dir: Some(PathBuf::from("out")),
            flush_threshold: 10,
            ..SplitWorksConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(SplitWorksConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "flush_threshold = \"many\"").unwrap();
        assert!(SplitWorksConfig::load_from(&path).is_err());
    }
}
