//! Report snapshots
//!
//! A [`ReportSnapshot`] is one generated "Pathway Hierarchy Tree" report:
//! the generation time, the declared pathway total and the forest of
//! root-level pathways.

use crate::hash::ContentHash;
use crate::node::{PathwayNode, Walk};
use crate::path::PathwayPath;
use crate::timestamp::GeneratedAt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    /// Generation time from the header
    pub generated_at: GeneratedAt,
    /// Pathway total as declared in the header
    pub total_pathways: u64,
    /// Root-level pathways in report order
    pub roots: Vec<PathwayNode>,
}

impl ReportSnapshot {
    /// Snapshot whose declared total is computed from the forest
    #[must_use]
    pub fn new(generated_at: GeneratedAt, roots: Vec<PathwayNode>) -> Self {
        let mut snapshot = Self {
            generated_at,
            total_pathways: 0,
            roots,
        };
        snapshot.total_pathways = snapshot.computed_total();
        snapshot
    }

    /// Replace the declared total with the computed one
    #[must_use]
    pub fn with_computed_total(mut self) -> Self {
        self.total_pathways = self.computed_total();
        self
    }

    /// Depth-first walk over all nodes with their paths
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.roots, &PathwayPath::root())
    }

    /// Number of bullets in the body
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(PathwayNode::node_count).sum()
    }

    /// Distinct pathway names in the body
    #[must_use]
    pub fn distinct_names(&self) -> BTreeSet<&str> {
        self.walk().map(|(_, node)| node.name.as_str()).collect()
    }

    /// Pathway total implied by the body (distinct names)
    #[must_use]
    pub fn computed_total(&self) -> u64 {
        self.distinct_names().len() as u64
    }

    /// Sum of all counts shown, saturating at `u64::MAX`
    #[must_use]
    pub fn total_interactions(&self) -> u64 {
        self.roots
            .iter()
            .map(PathwayNode::subtree_interactions)
            .fold(0, u64::saturating_add)
    }

    /// Deepest nesting level (0 when only root-level bullets exist)
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.roots
            .iter()
            .map(PathwayNode::max_depth)
            .max()
            .unwrap_or(0)
    }

    /// Node at `path`, if present
    #[must_use]
    pub fn find(&self, path: &PathwayPath) -> Option<&PathwayNode> {
        let (head, rest) = path.segments().split_first()?;
        self.roots
            .iter()
            .find(|root| &root.name == head)
            .and_then(|root| root.find(rest))
    }

    /// Counts per path, one per occurrence in report order
    ///
    /// A path repeats when a parent lists the same child name twice.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<PathwayPath, Vec<Option<u64>>> {
        let mut entries: BTreeMap<PathwayPath, Vec<Option<u64>>> = BTreeMap::new();
        for (path, node) in self.walk() {
            entries.entry(path).or_default().push(node.interaction_count);
        }
        entries
    }

    /// Hash of the tree alone, ignoring the header
    ///
    /// Two generations with the same pathways, nesting and counts share a
    /// body hash even when their timestamps differ.
    #[must_use]
    pub fn body_hash(&self) -> ContentHash {
        let mut hasher = ContentHash::hasher();
        for (path, node) in self.walk() {
            hasher.update(&path.depth().to_le_bytes());
            hasher.update(node.name.as_bytes());
            hasher.update(b"\0");
            match node.interaction_count {
                Some(count) => hasher.update(&count.to_le_bytes()),
                None => hasher.update(b"-"),
            };
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ReportSnapshot {
        let ts: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
        ReportSnapshot::new(
            ts,
            vec![
                PathwayNode::leaf("Cell Death").with_child(
                    PathwayNode::leaf("Apoptosis")
                        .with_count(12)
                        .with_child(PathwayNode::leaf("Caspase Activation").with_count(3)),
                ),
                PathwayNode::leaf("Protein Quality Control")
                    .with_child(PathwayNode::leaf("Autophagy").with_count(5))
                    .with_child(PathwayNode::leaf("Caspase Activation").with_count(1)),
            ],
        )
    }

    #[test]
    fn totals_count_distinct_names() {
        let snapshot = sample();
        assert_eq!(snapshot.node_count(), 6);
        assert_eq!(snapshot.computed_total(), 5);
        assert_eq!(snapshot.total_pathways, 5);
        assert_eq!(snapshot.total_interactions(), 21);
        assert_eq!(snapshot.max_depth(), 2);
    }

    #[test]
    fn find_by_path() {
        let snapshot = sample();
        let path: PathwayPath = "Cell Death > Apoptosis > Caspase Activation".parse().unwrap();
        assert_eq!(snapshot.find(&path).unwrap().interaction_count, Some(3));
        assert!(snapshot.find(&PathwayPath::root()).is_none());
    }

    #[test]
    fn entries_keyed_by_path() {
        let entries = sample().entries();
        assert_eq!(entries.len(), 6);
        let path: PathwayPath = "Protein Quality Control > Autophagy".parse().unwrap();
        assert_eq!(entries[&path], vec![Some(5)]);
        assert_eq!(entries[&PathwayPath::single("Cell Death")], vec![None]);
    }

    #[test]
    fn entries_keep_repeated_paths() {
        let ts: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
        let snapshot = ReportSnapshot::new(
            ts,
            vec![PathwayNode::leaf("A")
                .with_child(PathwayNode::leaf("X").with_count(1))
                .with_child(PathwayNode::leaf("X").with_count(2))],
        );
        let path: PathwayPath = "A > X".parse().unwrap();
        assert_eq!(snapshot.entries()[&path], vec![Some(1), Some(2)]);
    }

    #[test]
    fn body_hash_ignores_header() {
        let a = sample();
        let mut b = sample();
        b.generated_at = "2026-03-01T00:00:00+00:00".parse().unwrap();
        b.total_pathways = 99;
        assert_eq!(a.body_hash(), b.body_hash());

        b.roots[0].children[0].interaction_count = Some(13);
        assert_ne!(a.body_hash(), b.body_hash());
    }

    #[test]
    fn body_hash_sees_nesting() {
        let ts: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
        let nested = ReportSnapshot::new(
            ts,
            vec![PathwayNode::leaf("A").with_child(PathwayNode::leaf("B"))],
        );
        let flat = ReportSnapshot::new(ts, vec![PathwayNode::leaf("A"), PathwayNode::leaf("B")]);
        assert_ne!(nested.body_hash(), flat.body_hash());
    }
}
