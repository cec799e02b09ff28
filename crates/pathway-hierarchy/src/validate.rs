//! Structural checks over a hierarchy graph

use crate::config::HierarchyConfig;
use crate::document::PathwayKind;
use crate::graph::HierarchyGraph;
use petgraph::Direction;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, does not invalidate the hierarchy
    Warning,
    /// The hierarchy is invalid
    Error,
}

/// What a check found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    /// Interaction assigned to no pathway
    UnassignedInteraction {
        /// Interaction identifier
        interaction: String,
    },
    /// Interaction assigned to several pathways
    AmbiguousInteraction {
        /// Interaction identifier
        interaction: String,
        /// Assigned pathways
        pathways: Vec<String>,
    },
    /// Interaction assigned to a pathway that does not exist
    UnknownAssignment {
        /// Interaction identifier
        interaction: String,
        /// Missing pathway
        pathway: String,
    },
    /// No interactions anywhere in the subtree
    DeadPathway {
        /// Pathway name
        name: String,
    },
    /// Not reachable from any root category
    Unreachable {
        /// Pathway name
        name: String,
    },
    /// Name used by more than one record
    DuplicateName {
        /// Pathway name
        name: String,
        /// Number of records
        occurrences: usize,
    },
    /// Chain does not begin at a root category
    ChainOutsideRoot {
        /// Pathway name
        name: String,
        /// First chain element
        start: String,
    },
    /// Sibling pathway placed on a primary chain
    SiblingPrimaryParent {
        /// Sibling name
        name: String,
        /// Parent holding the primary link
        parent: String,
    },
    /// Parent links form a cycle
    Cycle {
        /// Pathways on the cycle, sorted
        members: Vec<String>,
    },
}

impl FindingKind {
    /// Severity of this kind of finding
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::AmbiguousInteraction { .. } | Self::DeadPathway { .. } | Self::SiblingPrimaryParent { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl Display for FindingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnassignedInteraction { interaction } => {
                write!(f, "interaction {interaction} is not assigned to any pathway")
            }
            Self::AmbiguousInteraction { interaction, pathways } => write!(
                f,
                "interaction {interaction} is assigned to {} pathways: {}",
                pathways.len(),
                pathways.join(", ")
            ),
            Self::UnknownAssignment { interaction, pathway } => {
                write!(f, "interaction {interaction} is assigned to unknown pathway '{pathway}'")
            }
            Self::DeadPathway { name } => write!(f, "'{name}' has no interactions in its subtree"),
            Self::Unreachable { name } => write!(f, "'{name}' cannot be reached from a root category"),
            Self::DuplicateName { name, occurrences } => {
                write!(f, "'{name}' is defined {occurrences} times")
            }
            Self::ChainOutsideRoot { name, start } => {
                write!(f, "chain of '{name}' starts at '{start}', not a root category")
            }
            Self::SiblingPrimaryParent { name, parent } => {
                write!(f, "sibling '{name}' has a primary link from '{parent}'")
            }
            Self::Cycle { members } => write!(f, "cycle among {}", members.join(", ")),
        }
    }
}

/// Finding with its severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Severity
    pub severity: Severity,
    /// What was found
    #[serde(flatten)]
    pub kind: FindingKind,
}

impl From<FindingKind> for Finding {
    fn from(kind: FindingKind) -> Self {
        Self {
            severity: kind.severity(),
            kind,
        }
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        };
        write!(f, "[{tag}] {}", self.kind)
    }
}

/// Hierarchy figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// Pathways in the graph
    pub total_pathways: usize,
    /// Root categories present
    pub root_pathways: usize,
    /// Main pathways
    pub main_pathways: usize,
    /// Sibling pathways
    pub sibling_pathways: usize,
    /// Sum of direct interaction counts
    pub total_interactions: u64,
    /// Assignments naming at least one pathway
    pub assigned_interactions: usize,
}

/// Outcome of validating a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyReport {
    /// True when there are no errors
    pub valid: bool,
    /// Figures
    pub stats: HierarchyStats,
    /// Findings, grouped by check
    pub findings: Vec<Finding>,
}

impl HierarchyReport {
    /// Error findings
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    /// Warning findings
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }
}

impl HierarchyGraph {
    /// Figures for the graph
    #[must_use]
    pub fn stats(&self, config: &HierarchyConfig) -> HierarchyStats {
        let mut stats = HierarchyStats {
            total_pathways: self.len(),
            assigned_interactions: self.assignments.iter().filter(|a| !a.pathways.is_empty()).count(),
            ..HierarchyStats::default()
        };
        for pathway in self.pathways() {
            match pathway.kind {
                PathwayKind::Main => stats.main_pathways += 1,
                PathwayKind::Sibling => stats.sibling_pathways += 1,
            }
            if config.is_root(&pathway.name) {
                stats.root_pathways += 1;
            }
            stats.total_interactions = stats.total_interactions.saturating_add(pathway.direct_interactions);
        }
        stats
    }

    /// Run every structural check
    #[must_use]
    pub fn validate(&self, config: &HierarchyConfig) -> HierarchyReport {
        let mut findings: Vec<Finding> = Vec::new();

        for assignment in &self.assignments {
            let interaction = &assignment.interaction;
            if assignment.pathways.is_empty() {
                findings.push(
                    FindingKind::UnassignedInteraction {
                        interaction: interaction.clone(),
                    }
                    .into(),
                );
                continue;
            }
            if assignment.pathways.len() > 1 {
                findings.push(
                    FindingKind::AmbiguousInteraction {
                        interaction: interaction.clone(),
                        pathways: assignment.pathways.clone(),
                    }
                    .into(),
                );
            }
            for pathway in assignment.pathways.iter().filter(|p| !self.contains(p.as_str())) {
                findings.push(
                    FindingKind::UnknownAssignment {
                        interaction: interaction.clone(),
                        pathway: pathway.clone(),
                    }
                    .into(),
                );
            }
        }

        findings.extend(
            self.dead_pathways(config)
                .into_iter()
                .map(|name| FindingKind::DeadPathway { name }.into()),
        );

        findings.extend(
            self.unreachable(config)
                .into_iter()
                .map(|name| FindingKind::Unreachable { name }.into()),
        );

        findings.extend(self.duplicates.iter().map(|(name, occurrences)| {
            FindingKind::DuplicateName {
                name: name.clone(),
                occurrences: *occurrences,
            }
            .into()
        }));

        for pathway in self.pathways() {
            if let Some(start) = pathway.chain.first() {
                if !config.is_root(start) {
                    findings.push(
                        FindingKind::ChainOutsideRoot {
                            name: pathway.name.clone(),
                            start: start.clone(),
                        }
                        .into(),
                    );
                }
            }
        }

        for (id, pathway) in &self.pathways {
            if pathway.kind != PathwayKind::Sibling {
                continue;
            }
            let mut parents: Vec<&str> = self
                .graph
                .neighbors_directed(*id, Direction::Incoming)
                .filter(|parent| self.graph.edge_weight(*parent, *id).is_some_and(|link| link.primary))
                .map(|parent| self.name_of(parent))
                .collect();
            parents.sort_unstable();
            findings.extend(parents.into_iter().map(|parent| {
                FindingKind::SiblingPrimaryParent {
                    name: pathway.name.clone(),
                    parent: parent.to_string(),
                }
                .into()
            }));
        }

        findings.extend(
            self.cycles()
                .into_iter()
                .map(|members| FindingKind::Cycle { members }.into()),
        );

        let report = HierarchyReport {
            valid: !findings.iter().any(|f| f.severity == Severity::Error),
            stats: self.stats(config),
            findings,
        };
        tracing::info!(
            valid = report.valid,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            pathways = report.stats.total_pathways,
            "validated hierarchy"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HierarchyDocument, ParentLink, PathwayRecord};

    fn graph(pathways: Vec<PathwayRecord>) -> HierarchyGraph {
        HierarchyGraph::from_document(&HierarchyDocument {
            pathways,
            assignments: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn severities() {
        assert_eq!(
            FindingKind::DeadPathway { name: "A".into() }.severity(),
            Severity::Warning
        );
        assert_eq!(
            FindingKind::Unreachable { name: "A".into() }.severity(),
            Severity::Error
        );
        let finding: Finding = FindingKind::Cycle {
            members: vec!["A".into(), "B".into()],
        }
        .into();
        assert_eq!(finding.to_string(), "[ERROR] cycle among A, B");
    }

    #[test]
    fn valid_minimal_hierarchy() {
        let report = graph(vec![
            PathwayRecord::new("Cell Cycle"),
            PathwayRecord::new("Mitosis")
                .with_interactions(3)
                .with_parent(ParentLink::primary("Cell Cycle"))
                .with_chain(["Cell Cycle", "Mitosis"]),
        ])
        .validate(&HierarchyConfig::new());
        assert!(report.valid);
        assert!(report.findings.is_empty());
        assert_eq!(report.stats.root_pathways, 1);
        assert_eq!(report.stats.total_interactions, 3);
    }

    #[test]
    fn sibling_with_primary_parent_warns() {
        let report = graph(vec![
            PathwayRecord::new("Cell Cycle"),
            PathwayRecord::new("Context")
                .with_kind(PathwayKind::Sibling)
                .with_parent(ParentLink::primary("Cell Cycle")),
        ])
        .validate(&HierarchyConfig::new());
        assert!(report.valid);
        assert_eq!(
            report.findings,
            vec![Finding::from(FindingKind::SiblingPrimaryParent {
                name: "Context".into(),
                parent: "Cell Cycle".into(),
            })]
        );
    }

    #[test]
    fn cycle_makes_hierarchy_invalid() {
        let report = graph(vec![
            PathwayRecord::new("Cell Cycle"),
            PathwayRecord::new("A")
                .with_interactions(1)
                .with_parent(ParentLink::primary("Cell Cycle"))
                .with_parent(ParentLink::secondary("B")),
            PathwayRecord::new("B")
                .with_interactions(1)
                .with_parent(ParentLink::primary("A")),
        ])
        .validate(&HierarchyConfig::new());
        assert!(!report.valid);
        assert!(report
            .errors()
            .any(|f| matches!(&f.kind, FindingKind::Cycle { members } if members == &["A", "B"])));
    }

    #[test]
    fn findings_serialize_with_kind_tag() {
        let report = graph(vec![PathwayRecord::new("Stray").with_interactions(1)]).validate(&HierarchyConfig::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["findings"][0]["kind"], "unreachable");
        assert_eq!(json["findings"][0]["severity"], "error");
        assert_eq!(json["findings"][0]["name"], "Stray");
    }
}
