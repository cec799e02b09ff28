//! Pathway hierarchy documents
//!
//! Loads pathway records with their parent links, checks the structural
//! rules a classification hierarchy must satisfy, repairs what can be
//! repaired and builds report snapshots from the result.
//!
//! ```rust,ignore
//! use pathway_hierarchy::{HierarchyConfig, HierarchyDocument, HierarchyGraph};
//! use pathway_model::GeneratedAt;
//!
//! let config = HierarchyConfig::default();
//! let mut graph = HierarchyGraph::from_document(&HierarchyDocument::load("hierarchy.json")?)?;
//! graph.fix_orphans(&config);
//! let report = graph.validate(&config);
//! if report.valid {
//!     let snapshot = graph.build_snapshot(&config, GeneratedAt::now())?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod tree;
pub mod validate;

pub use config::{CountMode, HierarchyConfig, DEFAULT_FALLBACK_ROOT, DEFAULT_ROOT_CATEGORIES};
pub use document::{Assignment, DocumentFormat, HierarchyDocument, ParentLink, PathwayKind, PathwayRecord};
pub use error::{HierarchyError, HierarchyResult};
pub use graph::{HierarchyGraph, Link, LinkSource, Pathway, REPAIRED_LINK_CONFIDENCE};
pub use validate::{Finding, FindingKind, HierarchyReport, HierarchyStats, Severity};
