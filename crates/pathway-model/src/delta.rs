//! Structural deltas between report snapshots
//!
//! Provides [`SnapshotDelta`], the semantic (not text-based) difference
//! between two generations of a report: pathways added, removed, moved to a
//! different parent, or shown with a different interaction count.

use crate::path::PathwayPath;
use crate::snapshot::ReportSnapshot;
use crate::timestamp::GeneratedAt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// One change between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DeltaOperation {
    /// Pathway present only in the newer snapshot
    Added {
        /// Location in the newer snapshot
        path: PathwayPath,
        /// Count shown in the newer snapshot
        count: Option<u64>,
    },

    /// Pathway present only in the older snapshot
    Removed {
        /// Location in the older snapshot
        path: PathwayPath,
        /// Count shown in the older snapshot
        count: Option<u64>,
    },

    /// Pathway re-parented between snapshots
    Moved {
        /// Pathway name
        name: String,
        /// Location in the older snapshot
        from: PathwayPath,
        /// Location in the newer snapshot
        to: PathwayPath,
        /// Count shown in the older snapshot
        count_before: Option<u64>,
        /// Count shown in the newer snapshot
        count_after: Option<u64>,
    },

    /// Same location, different count
    CountChanged {
        /// Location in both snapshots
        path: PathwayPath,
        /// Count in the older snapshot
        before: Option<u64>,
        /// Count in the newer snapshot
        after: Option<u64>,
    },
}

impl DeltaOperation {
    /// Path the operation is reported under (newer location when moved)
    #[must_use]
    pub fn path(&self) -> &PathwayPath {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::CountChanged { path, .. } => {
                path
            }
            Self::Moved { to, .. } => to,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Removed { .. } => 0,
            Self::Moved { .. } => 1,
            Self::Added { .. } => 2,
            Self::CountChanged { .. } => 3,
        }
    }
}

fn fmt_count(count: Option<u64>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}

impl Display for DeltaOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { path, count } => match count {
                Some(c) => write!(f, "+ {path} ({c} interactions)"),
                None => write!(f, "+ {path}"),
            },
            Self::Removed { path, count } => match count {
                Some(c) => write!(f, "- {path} ({c} interactions)"),
                None => write!(f, "- {path}"),
            },
            Self::Moved {
                from,
                to,
                count_before,
                count_after,
                ..
            } => {
                write!(f, "~ {from} => {to}")?;
                if count_before != count_after {
                    write!(
                        f,
                        " [{} -> {}]",
                        fmt_count(*count_before),
                        fmt_count(*count_after)
                    )?;
                }
                Ok(())
            }
            Self::CountChanged {
                path,
                before,
                after,
            } => write!(f, "* {path}: {} -> {}", fmt_count(*before), fmt_count(*after)),
        }
    }
}

/// Number of operations of each kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    /// Added pathways
    pub added: usize,
    /// Removed pathways
    pub removed: usize,
    /// Re-parented pathways
    pub moved: usize,
    /// Count changes in place
    pub count_changed: usize,
}

/// Difference between an older and a newer snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    /// Generation time of the older snapshot
    pub before: GeneratedAt,
    /// Generation time of the newer snapshot
    pub after: GeneratedAt,
    /// Declared total of the older snapshot
    pub total_before: u64,
    /// Declared total of the newer snapshot
    pub total_after: u64,
    /// Changes ordered by path
    pub operations: Vec<DeltaOperation>,
}

impl SnapshotDelta {
    /// Compute the delta from `older` to `newer`
    ///
    /// A name that disappears from exactly one path and appears at exactly
    /// one other path is reported as a move. Descendants carried along by a
    /// moved ancestor are not reported separately unless their count changed.
    #[must_use]
    pub fn between(older: &ReportSnapshot, newer: &ReportSnapshot) -> Self {
        let old_entries = older.entries();
        let new_entries = newer.entries();

        let mut operations = Vec::new();
        let mut removed: BTreeMap<&str, Vec<(&PathwayPath, Option<u64>)>> = BTreeMap::new();
        let mut added: BTreeMap<&str, Vec<(&PathwayPath, Option<u64>)>> = BTreeMap::new();

        // Occurrences of a repeated path pair up in report order
        for (path, before) in &old_entries {
            let after = new_entries.get(path).map_or(&[][..], Vec::as_slice);
            for (i, &count) in before.iter().enumerate() {
                match after.get(i) {
                    Some(&now) if now != count => operations.push(DeltaOperation::CountChanged {
                        path: path.clone(),
                        before: count,
                        after: now,
                    }),
                    Some(_) => {}
                    None => removed
                        .entry(path.last().unwrap_or_default())
                        .or_default()
                        .push((path, count)),
                }
            }
        }
        for (path, after) in &new_entries {
            let seen = old_entries.get(path).map_or(0, Vec::len);
            for &count in after.iter().skip(seen) {
                added
                    .entry(path.last().unwrap_or_default())
                    .or_default()
                    .push((path, count));
            }
        }

        let mut moves = Vec::new();
        for (name, gone) in &removed {
            match (gone.as_slice(), added.get(name).map(Vec::as_slice)) {
                ([(from, count_before)], Some([(to, count_after)])) => {
                    moves.push(((*from).clone(), (*to).clone(), *count_before, *count_after));
                }
                _ => operations.extend(gone.iter().map(|(path, count)| DeltaOperation::Removed {
                    path: (*path).clone(),
                    count: *count,
                })),
            }
        }
        for (name, appeared) in &added {
            let is_move = matches!(
                (removed.get(name).map(Vec::as_slice), appeared.as_slice()),
                (Some([_]), [_])
            );
            if !is_move {
                operations.extend(appeared.iter().map(|(path, count)| DeltaOperation::Added {
                    path: (*path).clone(),
                    count: *count,
                }));
            }
        }

        let move_pairs: HashSet<(PathwayPath, PathwayPath)> = moves
            .iter()
            .map(|(from, to, _, _)| (from.clone(), to.clone()))
            .collect();
        for (from, to, count_before, count_after) in moves {
            let carried = match (from.parent(), to.parent()) {
                (Some(fp), Some(tp)) if !fp.is_empty() && !tp.is_empty() => {
                    move_pairs.contains(&(fp, tp))
                }
                _ => false,
            };
            if carried {
                if count_before != count_after {
                    operations.push(DeltaOperation::CountChanged {
                        path: to,
                        before: count_before,
                        after: count_after,
                    });
                }
            } else {
                operations.push(DeltaOperation::Moved {
                    name: to.last().unwrap_or_default().to_string(),
                    from,
                    to,
                    count_before,
                    count_after,
                });
            }
        }

        operations.sort_by(|a, b| a.path().cmp(b.path()).then(a.rank().cmp(&b.rank())));

        Self {
            before: older.generated_at,
            after: newer.generated_at,
            total_before: older.total_pathways,
            total_after: newer.total_pathways,
            operations,
        }
    }

    /// True when the trees and declared totals are identical
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.total_before == self.total_after
    }

    /// Operation counts by kind
    #[must_use]
    pub fn summary(&self) -> DeltaSummary {
        self.operations
            .iter()
            .fold(DeltaSummary::default(), |mut acc, op| {
                match op {
                    DeltaOperation::Added { .. } => acc.added += 1,
                    DeltaOperation::Removed { .. } => acc.removed += 1,
                    DeltaOperation::Moved { .. } => acc.moved += 1,
                    DeltaOperation::CountChanged { .. } => acc.count_changed += 1,
                }
                acc
            })
    }
}

impl Display for SnapshotDelta {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = self.summary();
        writeln!(
            f,
            "{} -> {}: total {} -> {}, +{} -{} ~{} *{}",
            self.before,
            self.after,
            self.total_before,
            self.total_after,
            s.added,
            s.removed,
            s.moved,
            s.count_changed
        )?;
        for op in &self.operations {
            writeln!(f, "  {op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PathwayNode;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> GeneratedAt {
        s.parse().unwrap()
    }

    fn path(s: &str) -> PathwayPath {
        s.parse().unwrap()
    }

    fn older() -> ReportSnapshot {
        ReportSnapshot::new(
            ts("2025-01-12T10:00:00"),
            vec![
                PathwayNode::leaf("Cell Death").with_child(
                    PathwayNode::leaf("Apoptosis")
                        .with_count(12)
                        .with_child(PathwayNode::leaf("Caspase Activation").with_count(3)),
                ),
                PathwayNode::leaf("Metabolism")
                    .with_child(PathwayNode::leaf("Glycolysis").with_count(7))
                    .with_child(PathwayNode::leaf("Lipid Synthesis").with_count(1)),
                PathwayNode::leaf("Cellular Signaling"),
            ],
        )
    }

    #[test]
    fn identical_snapshots_are_empty() {
        let delta = SnapshotDelta::between(&older(), &older());
        assert!(delta.is_empty());
        assert_eq!(delta.summary(), DeltaSummary::default());
    }

    #[test]
    fn detects_add_remove_and_count_change() {
        let mut newer = older();
        newer.generated_at = ts("2025-01-13T10:00:00");
        newer.roots[1].children[0].interaction_count = Some(9);
        newer.roots[1].children.remove(1);
        newer.roots[2]
            .children
            .push(PathwayNode::leaf("MAPK Signaling").with_count(4));
        let newer = newer.with_computed_total();

        let delta = SnapshotDelta::between(&older(), &newer);
        assert_eq!(
            delta.operations,
            vec![
                DeltaOperation::Added {
                    path: path("Cellular Signaling > MAPK Signaling"),
                    count: Some(4),
                },
                DeltaOperation::CountChanged {
                    path: path("Metabolism > Glycolysis"),
                    before: Some(7),
                    after: Some(9),
                },
                DeltaOperation::Removed {
                    path: path("Metabolism > Lipid Synthesis"),
                    count: Some(1),
                },
            ]
        );
        assert!(!delta.is_empty());
    }

    #[test]
    fn subtree_move_reported_once() {
        let mut newer = older();
        let apoptosis = newer.roots[0].children.remove(0);
        newer.roots[2].children.push(apoptosis);

        let delta = SnapshotDelta::between(&older(), &newer);
        assert_eq!(
            delta.operations,
            vec![DeltaOperation::Moved {
                name: "Apoptosis".to_string(),
                from: path("Cell Death > Apoptosis"),
                to: path("Cellular Signaling > Apoptosis"),
                count_before: Some(12),
                count_after: Some(12),
            }]
        );
        assert_eq!(delta.summary().moved, 1);
    }

    #[test]
    fn carried_descendant_with_new_count_is_count_change() {
        let mut newer = older();
        let mut apoptosis = newer.roots[0].children.remove(0);
        apoptosis.children[0].interaction_count = Some(5);
        newer.roots[2].children.push(apoptosis);

        let delta = SnapshotDelta::between(&older(), &newer);
        let summary = delta.summary();
        assert_eq!(summary.moved, 1);
        assert_eq!(summary.count_changed, 1);
        assert!(delta.operations.contains(&DeltaOperation::CountChanged {
            path: path("Cellular Signaling > Apoptosis > Caspase Activation"),
            before: Some(3),
            after: Some(5),
        }));
    }

    #[test]
    fn ambiguous_names_are_add_and_remove() {
        let old = ReportSnapshot::new(
            ts("2025-01-12T10:00:00"),
            vec![
                PathwayNode::leaf("A").with_child(PathwayNode::leaf("X")),
                PathwayNode::leaf("B").with_child(PathwayNode::leaf("X")),
                PathwayNode::leaf("C"),
            ],
        );
        let new = ReportSnapshot::new(
            ts("2025-01-13T10:00:00"),
            vec![
                PathwayNode::leaf("A"),
                PathwayNode::leaf("B"),
                PathwayNode::leaf("C").with_child(PathwayNode::leaf("X")),
            ],
        );
        let summary = SnapshotDelta::between(&old, &new).summary();
        assert_eq!(summary.moved, 0);
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.added, 1);
    }

    #[test]
    fn repeated_sibling_changes_are_reported() {
        let twice = ReportSnapshot::new(
            ts("2025-01-12T10:00:00"),
            vec![PathwayNode::leaf("A")
                .with_child(PathwayNode::leaf("X").with_count(1))
                .with_child(PathwayNode::leaf("X").with_count(2))],
        );
        let once = ReportSnapshot::new(
            ts("2025-01-13T10:00:00"),
            vec![PathwayNode::leaf("A").with_child(PathwayNode::leaf("X").with_count(1))],
        );
        assert_ne!(twice.body_hash(), once.body_hash());

        let delta = SnapshotDelta::between(&twice, &once);
        assert_eq!(
            delta.operations,
            vec![DeltaOperation::Removed {
                path: path("A > X"),
                count: Some(2),
            }]
        );
        let back = SnapshotDelta::between(&once, &twice);
        assert_eq!(
            back.operations,
            vec![DeltaOperation::Added {
                path: path("A > X"),
                count: Some(2),
            }]
        );

        let mut recounted = twice.clone();
        recounted.roots[0].children[1].interaction_count = Some(7);
        let delta = SnapshotDelta::between(&twice, &recounted);
        assert_eq!(
            delta.operations,
            vec![DeltaOperation::CountChanged {
                path: path("A > X"),
                before: Some(2),
                after: Some(7),
            }]
        );
    }

    #[test]
    fn display_lists_operations() {
        let mut newer = older();
        newer.roots[1].children[0].interaction_count = Some(9);
        let text = SnapshotDelta::between(&older(), &newer).to_string();
        assert!(text.contains("* Metabolism > Glycolysis: 7 -> 9"));
        assert!(text.contains("+0 -0 ~0 *1"));
    }
}
