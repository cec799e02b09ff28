//! Hierarchy documents: pathway records and interaction assignments

use crate::error::{HierarchyError, HierarchyResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Role of a pathway in the hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathwayKind {
    /// Regular pathway
    #[default]
    Main,
    /// Context placeholder shown next to a main pathway
    Sibling,
}

/// Link from a pathway to one of its parents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Parent pathway name
    pub name: String,
    /// Whether the link is on the pathway's primary chain
    #[serde(default = "default_primary")]
    pub primary: bool,
}

fn default_primary() -> bool {
    true
}

impl ParentLink {
    /// Primary link to `name`
    #[must_use]
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: true,
        }
    }

    /// Secondary link to `name`
    #[must_use]
    pub fn secondary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: false,
        }
    }
}

/// One pathway in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayRecord {
    /// Pathway name
    pub name: String,
    /// Main or sibling
    #[serde(default)]
    pub kind: PathwayKind,
    /// Ontology id, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_id: Option<String>,
    /// Direct interaction count; tallied from assignments when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<u64>,
    /// Parent links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentLink>,
    /// Root-first hierarchy chain ending at this pathway
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
}

impl PathwayRecord {
    /// Main pathway without parents
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PathwayKind::Main,
            ontology_id: None,
            interactions: None,
            parents: Vec::new(),
            chain: Vec::new(),
        }
    }

    /// With kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: PathwayKind) -> Self {
        self.kind = kind;
        self
    }

    /// With explicit interaction count
    #[inline]
    #[must_use]
    pub fn with_interactions(mut self, count: u64) -> Self {
        self.interactions = Some(count);
        self
    }

    /// With parent link
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, link: ParentLink) -> Self {
        self.parents.push(link);
        self
    }

    /// With hierarchy chain
    #[must_use]
    pub fn with_chain<I, S>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chain = chain.into_iter().map(Into::into).collect();
        self
    }
}

/// Interaction and the pathways it was assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Interaction identifier
    pub interaction: String,
    /// Assigned pathway names
    #[serde(default)]
    pub pathways: Vec<String>,
}

/// Encoding of a document file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl DocumentFormat {
    /// Guess format from a file extension; anything but `.yaml`/`.yml` is JSON
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl Display for DocumentFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        })
    }
}

/// Pathways and interaction assignments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDocument {
    /// Pathway records, in document order
    #[serde(default)]
    pub pathways: Vec<PathwayRecord>,
    /// Interaction assignments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<Assignment>,
}

impl HierarchyDocument {
    /// Decode document text
    ///
    /// # Errors
    /// Returns `HierarchyError::Decode` if the text is not a valid document
    pub fn parse(text: &str, format: DocumentFormat) -> HierarchyResult<Self> {
        let decoded = match format {
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        };
        decoded.map_err(|message| HierarchyError::Decode { format, message })
    }

    /// Read and decode a document file, choosing the format by extension
    ///
    /// # Errors
    /// - `HierarchyError::Io` if the file cannot be read
    /// - `HierarchyError::Decode` if its contents are not a valid document
    pub fn load(path: impl AsRef<Path>) -> HierarchyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| HierarchyError::io_error(path, e))?;
        let doc = Self::parse(&text, DocumentFormat::from_path(path))?;
        tracing::debug!(
            path = %path.display(),
            pathways = doc.pathways.len(),
            assignments = doc.assignments.len(),
            "loaded hierarchy document"
        );
        Ok(doc)
    }

    /// Encode as pretty JSON
    ///
    /// # Errors
    /// Returns `HierarchyError::Decode` if serialization fails
    pub fn to_json(&self) -> HierarchyResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HierarchyError::Decode {
            format: DocumentFormat::Json,
            message: e.to_string(),
        })
    }
}
