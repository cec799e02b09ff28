//! Snapshot history
//!
//! Orders the generations of a report by timestamp, drops generations whose
//! tree did not change, and produces the deltas between neighbours.

use pathway_model::{ContentHash, GeneratedAt, ReportSnapshot, SnapshotDelta};
use serde::Serialize;
use std::sync::Arc;

/// One generation in the history
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Where the snapshot came from (usually a file path)
    pub source: String,
    /// The snapshot
    pub snapshot: Arc<ReportSnapshot>,
    /// Hash of the tree, ignoring the header
    pub body_hash: ContentHash,
}

/// Per-generation figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    /// Where the snapshot came from
    pub source: String,
    /// Generation time
    pub generated_at: GeneratedAt,
    /// Total declared in the header
    pub declared_total: u64,
    /// Distinct names in the body
    pub distinct_pathways: u64,
    /// Bullets in the body
    pub nodes: usize,
    /// Sum of shown counts
    pub interactions: u64,
    /// Deepest nesting level
    pub max_depth: usize,
    /// Hash of the tree
    pub body_hash: ContentHash,
}

/// Generations of a report in chronological order
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    entries: Vec<HistoryEntry>,
}

impl SnapshotHistory {
    /// Empty history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a generation, keeping chronological order (ties by source)
    pub fn push(&mut self, source: impl Into<String>, snapshot: Arc<ReportSnapshot>) {
        let entry = HistoryEntry {
            source: source.into(),
            body_hash: snapshot.body_hash(),
            snapshot,
        };
        let key = (entry.snapshot.generated_at, entry.source.as_str());
        let at = self
            .entries
            .partition_point(|e| (e.snapshot.generated_at, e.source.as_str()) <= key);
        self.entries.insert(at, entry);
    }

    /// Generations, oldest first
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of generations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for an empty history
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest generation
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Drop generations whose tree equals the preceding generation's
    ///
    /// Returns the number of generations removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.dedup_by(|later, earlier| {
            let same = later.body_hash == earlier.body_hash;
            if same {
                tracing::debug!(
                    source = %later.source,
                    kept = %earlier.source,
                    "dropping unchanged generation"
                );
            }
            same
        });
        before - self.entries.len()
    }

    /// Deltas between consecutive generations
    #[must_use]
    pub fn deltas(&self) -> Vec<SnapshotDelta> {
        self.entries
            .windows(2)
            .map(|pair| SnapshotDelta::between(&pair[0].snapshot, &pair[1].snapshot))
            .collect()
    }

    /// Figures for every generation
    #[must_use]
    pub fn summary(&self) -> Vec<SnapshotStats> {
        self.entries
            .iter()
            .map(|e| SnapshotStats {
                source: e.source.clone(),
                generated_at: e.snapshot.generated_at,
                declared_total: e.snapshot.total_pathways,
                distinct_pathways: e.snapshot.computed_total(),
                nodes: e.snapshot.node_count(),
                interactions: e.snapshot.total_interactions(),
                max_depth: e.snapshot.max_depth(),
                body_hash: e.body_hash,
            })
            .collect()
    }
}
