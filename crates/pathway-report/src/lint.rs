//! Format-level checks of a parsed snapshot
//!
//! Indentation and count syntax are enforced while parsing; this module
//! checks what only the whole tree can tell: the declared total, repeated
//! siblings, blank names and explicit zero counts.

use crate::config::ReportConfig;
use pathway_model::{PathwayPath, ReportSnapshot};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth reporting, not fatal
    Warning,
    /// The snapshot is not well-formed
    Error,
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LintKind {
    /// Declared total disagrees with the distinct names in the body
    TotalMismatch {
        /// Header value
        declared: u64,
        /// Distinct names in the body
        distinct: u64,
        /// Bullets in the body
        nodes: u64,
    },
    /// Same name twice under one parent
    DuplicateSibling {
        /// Parent path (empty for root level)
        parent: PathwayPath,
        /// Repeated name
        name: String,
    },
    /// Bullet without a name
    EmptyName {
        /// Location of the bullet
        path: PathwayPath,
    },
    /// Explicit `(0 interactions)` suffix
    ZeroCount {
        /// Location of the bullet
        path: PathwayPath,
    },
}

impl Display for LintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalMismatch {
                declared,
                distinct,
                nodes,
            } => write!(
                f,
                "declared total {declared} differs from {distinct} distinct pathways ({nodes} entries)"
            ),
            Self::DuplicateSibling { parent, name } => {
                write!(f, "'{name}' appears more than once under {parent}")
            }
            Self::EmptyName { path } => write!(f, "entry without a name at {path}"),
            Self::ZeroCount { path } => write!(f, "explicit zero interaction count at {path}"),
        }
    }
}

/// Finding with its severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    /// Severity
    pub severity: Severity,
    /// What was found
    #[serde(flatten)]
    pub kind: LintKind,
}

impl Display for LintIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        };
        write!(f, "[{tag}] {}", self.kind)
    }
}

/// All findings for one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    /// Findings in discovery order
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    /// True when any finding is an error
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// True when nothing was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of findings with the given severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    fn push(&mut self, severity: Severity, kind: LintKind) {
        self.issues.push(LintIssue { severity, kind });
    }
}

/// Check a parsed snapshot
#[must_use]
pub fn lint(snapshot: &ReportSnapshot, config: &ReportConfig) -> LintReport {
    let mut report = LintReport::default();

    let distinct = snapshot.computed_total();
    if snapshot.total_pathways != distinct {
        let severity = if config.strict_total {
            Severity::Error
        } else {
            Severity::Warning
        };
        report.push(
            severity,
            LintKind::TotalMismatch {
                declared: snapshot.total_pathways,
                distinct,
                nodes: snapshot.node_count() as u64,
            },
        );
    }

    check_siblings(&mut report, &PathwayPath::root(), snapshot.roots.iter().map(|n| n.name.as_str()));

    for (path, node) in snapshot.walk() {
        if node.name.trim().is_empty() {
            report.push(Severity::Error, LintKind::EmptyName { path: path.clone() });
        }
        if node.interaction_count == Some(0) {
            report.push(Severity::Warning, LintKind::ZeroCount { path: path.clone() });
        }
        check_siblings(&mut report, &path, node.children.iter().map(|n| n.name.as_str()));
    }

    report
}

fn check_siblings<'a>(report: &mut LintReport, parent: &PathwayPath, names: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            report.push(
                Severity::Warning,
                LintKind::DuplicateSibling {
                    parent: parent.clone(),
                    name: name.to_string(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathway_model::{GeneratedAt, PathwayNode};

    fn at() -> GeneratedAt {
        "2025-01-12T10:23:45".parse().unwrap()
    }

    #[test]
    fn clean_snapshot() {
        let snapshot = ReportSnapshot::new(
            at(),
            vec![PathwayNode::leaf("Cell Death").with_child(PathwayNode::leaf("Apoptosis").with_count(4))],
        );
        let report = lint(&snapshot, &ReportConfig::default());
        assert!(report.is_clean());
        assert!(!report.has_errors());
    }

    #[test]
    fn total_mismatch_severity_follows_config() {
        let mut snapshot = ReportSnapshot::new(at(), vec![PathwayNode::leaf("A"), PathwayNode::leaf("B")]);
        snapshot.total_pathways = 3;

        let lenient = lint(&snapshot, &ReportConfig::default());
        assert_eq!(lenient.count(Severity::Warning), 1);
        assert!(!lenient.has_errors());

        let strict = lint(&snapshot, &ReportConfig::default().with_strict_total(true));
        assert!(strict.has_errors());
        assert_eq!(
            strict.issues[0].kind,
            LintKind::TotalMismatch {
                declared: 3,
                distinct: 2,
                nodes: 2
            }
        );
    }

    #[test]
    fn shared_pathway_under_two_parents_is_not_a_mismatch() {
        let snapshot = ReportSnapshot::new(
            at(),
            vec![
                PathwayNode::leaf("A").with_child(PathwayNode::leaf("Shared")),
                PathwayNode::leaf("B").with_child(PathwayNode::leaf("Shared")),
            ],
        );
        assert_eq!(snapshot.total_pathways, 3);
        assert!(lint(&snapshot, &ReportConfig::default()).is_clean());
    }

    #[test]
    fn duplicate_siblings_reported_once() {
        let snapshot = ReportSnapshot::new(
            at(),
            vec![PathwayNode::leaf("A")
                .with_child(PathwayNode::leaf("X"))
                .with_child(PathwayNode::leaf("X"))
                .with_child(PathwayNode::leaf("X"))],
        );
        let report = lint(&snapshot, &ReportConfig::default());
        let dups: Vec<_> = report
            .issues
            .iter()
            .filter(|i| matches!(i.kind, LintKind::DuplicateSibling { .. }))
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].to_string(), "[WARN] 'X' appears more than once under A");
    }

    #[test]
    fn empty_name_and_zero_count() {
        let snapshot = ReportSnapshot::new(
            at(),
            vec![PathwayNode::leaf("A")
                .with_child(PathwayNode::leaf(""))
                .with_child(PathwayNode::leaf("B").with_count(0))],
        );
        let report = lint(&snapshot, &ReportConfig::default());
        assert!(report.has_errors());
        assert_eq!(report.count(Severity::Error), 1);
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(&i.kind, LintKind::ZeroCount { path } if path.to_string() == "A > B")));
    }

    #[test]
    fn issues_serialize_with_kind_tag() {
        let mut snapshot = ReportSnapshot::new(at(), vec![PathwayNode::leaf("A")]);
        snapshot.total_pathways = 2;
        let json = serde_json::to_value(lint(&snapshot, &ReportConfig::default())).unwrap();
        assert_eq!(json["issues"][0]["kind"], "total_mismatch");
        assert_eq!(json["issues"][0]["severity"], "warning");
        assert_eq!(json["issues"][0]["declared"], 2);
    }
}
