//! `pathway-tree` configuration file
//!
//! ```toml
//! [report]
//! indent_width = 2
//! strict_total = true
//!
//! [hierarchy]
//! fallback_root = "Protein Quality Control"
//! count_mode = "subtree"
//! ```

use anyhow::Context as _;
use pathway_hierarchy::HierarchyConfig;
use pathway_report::ReportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for every subcommand; each field has a default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Report format options
    pub report: ReportConfig,
    /// Hierarchy options
    pub hierarchy: HierarchyConfig,
}

impl CliConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Read a TOML configuration file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise
    ///
    /// # Errors
    /// Returns error if a given file cannot be loaded
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }
}
