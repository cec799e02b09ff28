//! Pathway graph built from a hierarchy document
//!
//! Edges point from parent to child. A pathway may have several parents;
//! the graph keeps every link and remembers whether it is primary.

use crate::config::HierarchyConfig;
use crate::document::{Assignment, HierarchyDocument, PathwayKind};
use crate::error::{HierarchyError, HierarchyResult};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Confidence given to links created by orphan repair
pub const REPAIRED_LINK_CONFIDENCE: f32 = 0.5;

/// Internal node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PathwayId(u32);

/// Where a link came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    /// Declared in the document
    Declared,
    /// Added by orphan repair
    OrphanFix,
}

/// Parent to child link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// On the child's primary chain
    pub primary: bool,
    /// Origin of the link
    pub source: LinkSource,
}

impl Link {
    /// Link taken from a document
    #[inline]
    #[must_use]
    pub fn declared(primary: bool) -> Self {
        Self {
            primary,
            source: LinkSource::Declared,
        }
    }

    /// Confidence in the placement
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> f32 {
        match self.source {
            LinkSource::Declared => 1.0,
            LinkSource::OrphanFix => REPAIRED_LINK_CONFIDENCE,
        }
    }
}

/// A pathway in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathway {
    /// Name
    pub name: String,
    /// Main or sibling
    pub kind: PathwayKind,
    /// Ontology id, if known
    pub ontology_id: Option<String>,
    /// Interactions attributed directly to this pathway
    pub direct_interactions: u64,
    /// Root-first hierarchy chain
    pub chain: Vec<String>,
}

/// Directed pathway graph
#[derive(Debug, Clone, Default)]
pub struct HierarchyGraph {
    pub(crate) graph: DiGraphMap<PathwayId, Link>,
    pub(crate) pathways: BTreeMap<PathwayId, Pathway>,
    by_name: HashMap<String, PathwayId>,
    pub(crate) duplicates: BTreeMap<String, usize>,
    pub(crate) assignments: Vec<Assignment>,
    next_id: u32,
}

impl HierarchyGraph {
    /// Build the graph from a document
    ///
    /// Records repeating an earlier name are counted as duplicates and left
    /// out of the graph. Pathways without an explicit count get the number
    /// of assignments naming them.
    ///
    /// # Errors
    /// Returns `HierarchyError::UnknownParent` if a link names a pathway
    /// missing from the document
    pub fn from_document(doc: &HierarchyDocument) -> HierarchyResult<Self> {
        let mut tally: HashMap<&str, u64> = HashMap::new();
        for assignment in &doc.assignments {
            for name in &assignment.pathways {
                *tally.entry(name.as_str()).or_default() += 1;
            }
        }

        let mut graph = Self {
            assignments: doc.assignments.clone(),
            ..Self::default()
        };

        let mut winners = Vec::with_capacity(doc.pathways.len());
        for record in &doc.pathways {
            if graph.by_name.contains_key(&record.name) {
                *graph.duplicates.entry(record.name.clone()).or_insert(1) += 1;
                continue;
            }
            let direct = record
                .interactions
                .unwrap_or_else(|| tally.get(record.name.as_str()).copied().unwrap_or(0));
            graph.insert(Pathway {
                name: record.name.clone(),
                kind: record.kind,
                ontology_id: record.ontology_id.clone(),
                direct_interactions: direct,
                chain: record.chain.clone(),
            });
            winners.push(record);
        }

        for record in winners {
            let child = graph.by_name[&record.name];
            for link in &record.parents {
                let parent = graph
                    .id(&link.name)
                    .ok_or_else(|| HierarchyError::UnknownParent {
                        pathway: record.name.clone(),
                        parent: link.name.clone(),
                    })?;
                graph.graph.add_edge(parent, child, Link::declared(link.primary));
            }
        }

        tracing::debug!(
            pathways = graph.len(),
            links = graph.graph.edge_count(),
            duplicates = graph.duplicates.len(),
            "built hierarchy graph"
        );
        Ok(graph)
    }

    fn insert(&mut self, pathway: Pathway) -> PathwayId {
        let id = PathwayId(self.next_id);
        self.next_id += 1;
        self.by_name.insert(pathway.name.clone(), id);
        self.pathways.insert(id, pathway);
        self.graph.add_node(id);
        id
    }

    fn remove(&mut self, id: PathwayId) -> Option<Pathway> {
        let pathway = self.pathways.remove(&id)?;
        self.by_name.remove(&pathway.name);
        self.graph.remove_node(id);
        Some(pathway)
    }

    pub(crate) fn id(&self, name: &str) -> Option<PathwayId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn name_of(&self, id: PathwayId) -> &str {
        self.pathways.get(&id).map_or("", |p| p.name.as_str())
    }

    /// Number of pathways
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    /// Check for an empty graph
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    /// Check if a pathway exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a pathway by name
    #[must_use]
    pub fn pathway(&self, name: &str) -> Option<&Pathway> {
        self.id(name).and_then(|id| self.pathways.get(&id))
    }

    /// All pathways in insertion order
    pub fn pathways(&self) -> impl Iterator<Item = &Pathway> {
        self.pathways.values()
    }

    /// Interaction assignments carried over from the document
    #[inline]
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Parent names, sorted
    #[must_use]
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.neighbours(name, Direction::Incoming)
    }

    /// Child names, sorted
    #[must_use]
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.neighbours(name, Direction::Outgoing)
    }

    fn neighbours(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(id) = self.id(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(id, direction)
            .map(|n| self.name_of(n))
            .collect();
        names.sort_unstable();
        names
    }

    /// Link between two pathways
    #[must_use]
    pub fn link(&self, parent: &str, child: &str) -> Option<Link> {
        let (p, c) = (self.id(parent)?, self.id(child)?);
        self.graph.edge_weight(p, c).copied()
    }

    /// Interactions in a pathway's subtree, each descendant counted once
    ///
    /// Returns `None` for an unknown pathway.
    #[must_use]
    pub fn subtree_interactions(&self, name: &str) -> Option<u64> {
        self.id(name).map(|id| self.subtree_total(id))
    }

    pub(crate) fn subtree_total(&self, start: PathwayId) -> u64 {
        let mut dfs = Dfs::new(&self.graph, start);
        let mut total = 0u64;
        while let Some(id) = dfs.next(&self.graph) {
            let direct = self.pathways.get(&id).map_or(0, |p| p.direct_interactions);
            total = total.saturating_add(direct);
        }
        total
    }

    /// Pathways with no interactions anywhere in their subtree
    ///
    /// Root categories and sibling pathways are never dead. Sorted by name.
    #[must_use]
    pub fn dead_pathways(&self, config: &HierarchyConfig) -> Vec<String> {
        let mut dead: Vec<String> = self
            .pathways
            .iter()
            .filter(|(_, p)| p.kind != PathwayKind::Sibling && !config.is_root(&p.name))
            .filter(|(id, _)| self.subtree_total(**id) == 0)
            .map(|(_, p)| p.name.clone())
            .collect();
        dead.sort();
        dead
    }

    /// Remove dead pathways and their links, returning their names
    pub fn prune_dead(&mut self, config: &HierarchyConfig) -> Vec<String> {
        let dead = self.dead_pathways(config);
        for name in &dead {
            if let Some(id) = self.id(name) {
                self.remove(id);
                tracing::debug!(pathway = %name, "pruned dead pathway");
            }
        }
        tracing::info!(pruned = dead.len(), "pruned dead pathways");
        dead
    }

    /// Non-root pathways without any parent, sorted by name
    #[must_use]
    pub fn orphans(&self, config: &HierarchyConfig) -> Vec<String> {
        let mut orphans: Vec<String> = self
            .pathways
            .iter()
            .filter(|(_, p)| !config.is_root(&p.name))
            .filter(|(id, _)| {
                self.graph
                    .neighbors_directed(**id, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(_, p)| p.name.clone())
            .collect();
        orphans.sort();
        orphans
    }

    /// Attach every orphan to the fallback root, returning the names fixed
    ///
    /// The fallback root is created when missing. Repaired links are
    /// primary for main pathways and secondary for siblings.
    pub fn fix_orphans(&mut self, config: &HierarchyConfig) -> Vec<String> {
        let orphans = self.orphans(config);
        if orphans.is_empty() {
            tracing::debug!("no orphan pathways");
            return orphans;
        }

        let root = match self.id(&config.fallback_root) {
            Some(id) => id,
            None => {
                tracing::info!(root = %config.fallback_root, "created fallback root");
                self.insert(Pathway {
                    name: config.fallback_root.clone(),
                    kind: PathwayKind::Main,
                    ontology_id: config.ontology_id(&config.fallback_root).map(str::to_string),
                    direct_interactions: 0,
                    chain: Vec::new(),
                })
            }
        };

        for name in &orphans {
            let Some(id) = self.id(name) else { continue };
            let primary = self.pathways.get(&id).is_some_and(|p| p.kind == PathwayKind::Main);
            self.graph.add_edge(
                root,
                id,
                Link {
                    primary,
                    source: LinkSource::OrphanFix,
                },
            );
            tracing::debug!(pathway = %name, root = %config.fallback_root, "fixed orphan pathway");
        }
        tracing::info!(fixed = orphans.len(), "fixed orphan pathways");
        orphans
    }

    /// Groups of pathways whose links form a cycle
    ///
    /// Each group is sorted by name; groups are sorted by their first name.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<String> = scc.iter().map(|id| self.name_of(*id).to_string()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Pathways not reachable from any root category present in the graph
    #[must_use]
    pub fn unreachable(&self, config: &HierarchyConfig) -> Vec<String> {
        let mut seen = HashSet::new();
        let roots = config.root_categories.keys().filter_map(|name| self.id(name));
        for root in roots {
            let mut dfs = Dfs::new(&self.graph, root);
            while let Some(id) = dfs.next(&self.graph) {
                seen.insert(id);
            }
        }
        let mut missing: Vec<String> = self
            .pathways
            .iter()
            .filter(|(id, _)| !seen.contains(*id))
            .map(|(_, p)| p.name.clone())
            .collect();
        missing.sort();
        missing
    }
}
