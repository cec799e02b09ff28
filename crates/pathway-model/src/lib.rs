//! Pathway Hierarchy Model
//!
//! Data model for "Pathway Hierarchy Tree" report snapshots.
//!
//! # Core Concepts
//!
//! - [`PathwayNode`]: a named pathway with an optional interaction count and
//!   ordered children
//! - [`ReportSnapshot`]: one generated report (timestamp, declared total,
//!   forest of root pathways)
//! - [`PathwayPath`]: root-first chain of names addressing a node
//! - [`ContentHash`]: 32-byte Blake3 hash for recognising identical content
//! - [`SnapshotDelta`]: structural difference between two snapshots
//!
//! # Example
//!
//! ```rust
//! use pathway_model::{GeneratedAt, PathwayNode, ReportSnapshot, SnapshotDelta};
//!
//! let at: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
//! let old = ReportSnapshot::new(at, vec![PathwayNode::leaf("Metabolism").with_count(3)]);
//! let mut new = old.clone();
//! new.roots[0].interaction_count = Some(4);
//!
//! let delta = SnapshotDelta::between(&old, &new);
//! assert_eq!(delta.summary().count_changed, 1);
//! ```

#![warn(unreachable_pub)]

mod delta;
mod error;
mod hash;
mod node;
mod path;
mod snapshot;
mod timestamp;

pub use delta::{DeltaOperation, DeltaSummary, SnapshotDelta};
pub use error::ModelError;
pub use hash::{ContentHash, ContentHasher, HashError};
pub use node::{PathwayNode, Walk};
pub use path::{PathError, PathwayPath, PATH_SEPARATOR};
pub use snapshot::ReportSnapshot;
pub use timestamp::{GeneratedAt, TimestampLayout};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
