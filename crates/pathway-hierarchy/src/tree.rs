//! Building report snapshots from a hierarchy graph

use crate::config::{CountMode, HierarchyConfig};
use crate::error::{HierarchyError, HierarchyResult};
use crate::graph::{HierarchyGraph, PathwayId};
use pathway_model::{GeneratedAt, PathwayNode, ReportSnapshot};

impl HierarchyGraph {
    /// Render the graph as a report snapshot
    ///
    /// Root categories appear in configured order (absent ones are skipped),
    /// children sorted by name. A pathway with several parents appears under
    /// each of them. Pathways unreachable from a root are left out.
    ///
    /// # Errors
    /// Returns `HierarchyError::CycleDetected` if the links are cyclic
    pub fn build_snapshot(&self, config: &HierarchyConfig, generated_at: GeneratedAt) -> HierarchyResult<ReportSnapshot> {
        if let Some(members) = self.cycles().into_iter().next() {
            return Err(HierarchyError::CycleDetected { members });
        }

        let roots: Vec<PathwayNode> = config
            .root_categories
            .keys()
            .filter_map(|name| self.id(name))
            .map(|id| self.build_node(id, config.count_mode))
            .collect();

        let snapshot = ReportSnapshot::new(generated_at, roots);
        tracing::debug!(
            roots = snapshot.roots.len(),
            pathways = snapshot.total_pathways,
            entries = snapshot.node_count(),
            "built snapshot from hierarchy"
        );
        Ok(snapshot)
    }

    fn build_node(&self, id: PathwayId, mode: CountMode) -> PathwayNode {
        let name = self.name_of(id);
        let mut node = PathwayNode::leaf(name);
        let count = match mode {
            CountMode::Direct => self.pathways.get(&id).map_or(0, |p| p.direct_interactions),
            CountMode::Subtree => self.subtree_total(id),
            CountMode::None => 0,
        };
        if count > 0 {
            node = node.with_count(count);
        }

        let mut children: Vec<PathwayId> = self.graph.neighbors(id).collect();
        children.sort_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        node.children = children.into_iter().map(|child| self.build_node(child, mode)).collect();
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HierarchyDocument, ParentLink, PathwayRecord};
    use pretty_assertions::assert_eq;

    fn at() -> GeneratedAt {
        "2025-01-12T10:23:45".parse().unwrap()
    }

    fn graph() -> HierarchyGraph {
        HierarchyGraph::from_document(&HierarchyDocument {
            pathways: vec![
                PathwayRecord::new("Cell Death"),
                PathwayRecord::new("Metabolism").with_interactions(1),
                PathwayRecord::new("Necroptosis")
                    .with_interactions(2)
                    .with_parent(ParentLink::primary("Cell Death")),
                PathwayRecord::new("Apoptosis")
                    .with_interactions(3)
                    .with_parent(ParentLink::primary("Cell Death"))
                    .with_parent(ParentLink::secondary("Metabolism")),
                PathwayRecord::new("Stray").with_interactions(9),
            ],
            assignments: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn roots_in_configured_order_children_by_name() {
        let snapshot = graph().build_snapshot(&HierarchyConfig::new(), at()).unwrap();
        let expected = vec![
            PathwayNode::leaf("Metabolism")
                .with_count(1)
                .with_child(PathwayNode::leaf("Apoptosis").with_count(3)),
            PathwayNode::leaf("Cell Death")
                .with_child(PathwayNode::leaf("Apoptosis").with_count(3))
                .with_child(PathwayNode::leaf("Necroptosis").with_count(2)),
        ];
        assert_eq!(snapshot.roots, expected);
        assert_eq!(snapshot.total_pathways, 4);
    }

    #[test]
    fn subtree_and_hidden_counts() {
        let config = HierarchyConfig::new().with_count_mode(CountMode::Subtree);
        let snapshot = graph().build_snapshot(&config, at()).unwrap();
        assert_eq!(snapshot.roots[0].interaction_count, Some(4));
        assert_eq!(snapshot.roots[1].interaction_count, Some(5));

        let config = HierarchyConfig::new().with_count_mode(CountMode::None);
        let snapshot = graph().build_snapshot(&config, at()).unwrap();
        assert_eq!(snapshot.total_interactions(), 0);
    }

    #[test]
    fn cycles_are_rejected() {
        let cyclic = HierarchyGraph::from_document(&HierarchyDocument {
            pathways: vec![
                PathwayRecord::new("Cell Death").with_parent(ParentLink::primary("Apoptosis")),
                PathwayRecord::new("Apoptosis").with_parent(ParentLink::primary("Cell Death")),
            ],
            assignments: Vec::new(),
        })
        .unwrap();
        let err = cyclic.build_snapshot(&HierarchyConfig::new(), at()).unwrap_err();
        assert!(matches!(err, HierarchyError::CycleDetected { .. }));
    }
}
