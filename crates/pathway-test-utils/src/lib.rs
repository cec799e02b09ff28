//! Testing utilities for the pathway tree workspace
//!
//! Shared fixtures: report text, the snapshots it describes, and hierarchy
//! documents.

#![allow(missing_docs)]

use pathway_model::{GeneratedAt, PathwayNode, ReportSnapshot};

/// Canonical rendering of [`sample_snapshot`]
pub const SAMPLE_REPORT: &str = "\
# Pathway Hierarchy Tree
# Generated: 2025-01-12T10:23:45.123456
# Total pathways: 9

- Cell Death
  - Apoptosis (12 interactions)
    - Caspase Activation (3 interactions)
  - Autophagy (4 interactions)

- Metabolism
  - Glycolysis (5 interactions)
  - Lipid Metabolism
    - Fatty Acid Oxidation (1 interactions)

- Protein Quality Control
  - Autophagy (4 interactions)
";

/// The next generation of [`SAMPLE_REPORT`]
///
/// Apoptosis grows to 15, Necroptosis is new, Glycolysis is gone and
/// Fatty Acid Oxidation moved up under Metabolism.
pub const LATER_REPORT: &str = "\
# Pathway Hierarchy Tree
# Generated: 2025-01-13T08:00:00
# Total pathways: 9

- Cell Death
  - Apoptosis (15 interactions)
    - Caspase Activation (3 interactions)
  - Autophagy (4 interactions)
  - Necroptosis (2 interactions)

- Metabolism
  - Fatty Acid Oxidation (1 interactions)
  - Lipid Metabolism

- Protein Quality Control
  - Autophagy (4 interactions)
";

/// Report whose nesting skips a level on line 6
pub const DEPTH_JUMP_REPORT: &str = "\
# Pathway Hierarchy Tree
# Generated: 2025-01-12T10:23:45
# Total pathways: 2

- Cell Death
    - Apoptosis
";

pub fn timestamp(text: &str) -> GeneratedAt {
    text.parse().unwrap()
}

/// Snapshot described by [`SAMPLE_REPORT`]
pub fn sample_snapshot() -> ReportSnapshot {
    ReportSnapshot::new(
        timestamp("2025-01-12T10:23:45.123456"),
        vec![
            PathwayNode::leaf("Cell Death")
                .with_child(
                    PathwayNode::leaf("Apoptosis")
                        .with_count(12)
                        .with_child(PathwayNode::leaf("Caspase Activation").with_count(3)),
                )
                .with_child(PathwayNode::leaf("Autophagy").with_count(4)),
            PathwayNode::leaf("Metabolism")
                .with_child(PathwayNode::leaf("Glycolysis").with_count(5))
                .with_child(
                    PathwayNode::leaf("Lipid Metabolism")
                        .with_child(PathwayNode::leaf("Fatty Acid Oxidation").with_count(1)),
                ),
            PathwayNode::leaf("Protein Quality Control").with_child(PathwayNode::leaf("Autophagy").with_count(4)),
        ],
    )
}

/// Snapshot with a single root and the given children
pub fn flat_snapshot(at: &str, root: &str, children: &[(&str, u64)]) -> ReportSnapshot {
    let root = children
        .iter()
        .fold(PathwayNode::leaf(root), |node, (name, count)| {
            node.with_child(PathwayNode::leaf(*name).with_count(*count))
        });
    ReportSnapshot::new(timestamp(at), vec![root])
}

/// Hierarchy document that satisfies every invariant
pub const VALID_HIERARCHY_JSON: &str = r#"{
  "pathways": [
    { "name": "Cell Death" },
    { "name": "Metabolism" },
    { "name": "Apoptosis", "parents": [{ "name": "Cell Death" }], "chain": ["Cell Death", "Apoptosis"] },
    { "name": "Caspase Activation", "parents": [{ "name": "Apoptosis" }] },
    { "name": "Autophagy", "interactions": 4,
      "parents": [{ "name": "Cell Death" }, { "name": "Metabolism", "primary": false }] },
    { "name": "Glycolysis", "parents": [{ "name": "Metabolism" }] },
    { "name": "Stress Context", "kind": "sibling", "parents": [{ "name": "Cell Death", "primary": false }] }
  ],
  "assignments": [
    { "interaction": "CASP3-CASP9", "pathways": ["Caspase Activation"] },
    { "interaction": "CASP8-FADD", "pathways": ["Caspase Activation"] },
    { "interaction": "BAX-BCL2", "pathways": ["Apoptosis"] },
    { "interaction": "HK1-GCK", "pathways": ["Glycolysis"] }
  ]
}"#;

/// Hierarchy document breaking several invariants at once
///
/// - `Lipid Droplets` has no interactions (dead)
/// - `Stray` has no parent (unreachable)
/// - `Glycolysis` appears twice
/// - `Apoptosis` has a chain that does not start at a root
/// - `Stress Context` is a sibling with a primary parent
/// - one assignment names no pathway, one names two, one names an unknown pathway
pub const BROKEN_HIERARCHY_JSON: &str = r#"{
  "pathways": [
    { "name": "Cell Death" },
    { "name": "Metabolism" },
    { "name": "Apoptosis", "interactions": 3, "parents": [{ "name": "Cell Death" }], "chain": ["Apoptosis"] },
    { "name": "Glycolysis", "interactions": 2, "parents": [{ "name": "Metabolism" }] },
    { "name": "Glycolysis", "interactions": 1, "parents": [{ "name": "Metabolism" }] },
    { "name": "Lipid Droplets", "parents": [{ "name": "Metabolism" }] },
    { "name": "Stray", "interactions": 1 },
    { "name": "Stress Context", "kind": "sibling", "parents": [{ "name": "Cell Death" }] }
  ],
  "assignments": [
    { "interaction": "EMPTY", "pathways": [] },
    { "interaction": "DUAL", "pathways": ["Apoptosis", "Glycolysis"] },
    { "interaction": "LOST", "pathways": ["Nowhere"] }
  ]
}"#;

/// Same shape as [`VALID_HIERARCHY_JSON`], as YAML
pub const VALID_HIERARCHY_YAML: &str = "\
pathways:
  - name: Cell Death
  - name: Apoptosis
    interactions: 2
    parents:
      - name: Cell Death
";
