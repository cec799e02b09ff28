//! Hierarchy configuration: root categories and tree options

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Root categories with their Gene Ontology ids, in display order
pub const DEFAULT_ROOT_CATEGORIES: &[(&str, &str)] = &[
    ("Cellular Signaling", "GO:0007165"),
    ("Metabolism", "GO:0008152"),
    ("Protein Quality Control", "GO:0006457"),
    ("Cell Death", "GO:0008219"),
    ("Cell Cycle", "GO:0007049"),
    ("DNA Damage Response", "GO:0006974"),
    ("Vesicle Transport", "GO:0016192"),
    ("Immune Response", "GO:0006955"),
    ("Neuronal Function", "GO:0050877"),
    ("Cytoskeleton Organization", "GO:0007015"),
    ("Transcriptional Regulation", "GO:0006355"),
    ("Chromatin Organization", "GO:0006325"),
];

/// Root that receives orphaned pathways
pub const DEFAULT_FALLBACK_ROOT: &str = "Protein Quality Control";

/// Which interaction count a built tree shows per node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    /// Interactions assigned to the pathway itself
    #[default]
    Direct,
    /// Interactions in the pathway's whole subtree
    Subtree,
    /// No counts
    None,
}

impl Display for CountMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Subtree => "subtree",
            Self::None => "none",
        })
    }
}

impl FromStr for CountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "subtree" => Ok(Self::Subtree),
            "none" => Ok(Self::None),
            other => Err(format!("unknown count mode '{other}' (expected direct, subtree or none)")),
        }
    }
}

/// Hierarchy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchyConfig {
    /// Root that orphans are attached to
    pub fallback_root: String,
    /// Count shown per node in built trees
    pub count_mode: CountMode,
    /// Root category name to ontology id, in display order
    pub root_categories: IndexMap<String, String>,
}

impl HierarchyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With root categories (replaces the defaults)
    #[must_use]
    pub fn with_roots<I, K, V>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.root_categories = roots.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// With fallback root
    #[inline]
    #[must_use]
    pub fn with_fallback_root(mut self, name: impl Into<String>) -> Self {
        self.fallback_root = name.into();
        self
    }

    /// With count mode
    #[inline]
    #[must_use]
    pub fn with_count_mode(mut self, mode: CountMode) -> Self {
        self.count_mode = mode;
        self
    }

    /// Check if a pathway name is a root category
    #[inline]
    #[must_use]
    pub fn is_root(&self, name: &str) -> bool {
        self.root_categories.contains_key(name)
    }

    /// Ontology id of a root category
    #[inline]
    #[must_use]
    pub fn ontology_id(&self, name: &str) -> Option<&str> {
        self.root_categories.get(name).map(String::as_str)
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            fallback_root: DEFAULT_FALLBACK_ROOT.to_string(),
            count_mode: CountMode::Direct,
            root_categories: DEFAULT_ROOT_CATEGORIES
                .iter()
                .map(|(name, go)| ((*name).to_string(), (*go).to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roots_in_order() {
        let config = HierarchyConfig::new();
        assert_eq!(config.root_categories.len(), 12);
        assert_eq!(config.root_categories.get_index(0).unwrap().0, "Cellular Signaling");
        assert_eq!(config.ontology_id("Protein Quality Control"), Some("GO:0006457"));
        assert!(config.is_root(&config.fallback_root));
        assert!(!config.is_root("Apoptosis"));
    }

    #[test]
    fn count_mode_parsing() {
        assert_eq!("Subtree".parse::<CountMode>(), Ok(CountMode::Subtree));
        assert_eq!("none".parse::<CountMode>(), Ok(CountMode::None));
        assert!("total".parse::<CountMode>().is_err());
        assert_eq!(CountMode::Direct.to_string(), "direct");
    }

    #[test]
    fn builder_replaces_roots() {
        let config = HierarchyConfig::new()
            .with_roots([("B", "GO:2"), ("A", "GO:1")])
            .with_fallback_root("A")
            .with_count_mode(CountMode::None);
        let names: Vec<_> = config.root_categories.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(config.count_mode, CountMode::None);
    }

    #[test]
    fn deserializes_partial_json() {
        let config: HierarchyConfig = serde_json::from_str(r#"{"count_mode": "subtree"}"#).unwrap();
        assert_eq!(config.count_mode, CountMode::Subtree);
        assert_eq!(config.fallback_root, DEFAULT_FALLBACK_ROOT);
    }
}
