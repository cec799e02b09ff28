//! Pathway tree nodes
//!
//! A [`PathwayNode`] is one bullet of a report: a pathway name, the optional
//! number of interactions attributed to it, and its ordered children.

use crate::path::PathwayPath;
use serde::{Deserialize, Serialize};

/// A named pathway and its nested sub-pathways
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayNode {
    /// Pathway name as written in the report
    pub name: String,
    /// Interaction count suffix, when the report shows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<u64>,
    /// Child pathways in report order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PathwayNode>,
}

impl PathwayNode {
    /// Node without count or children
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interaction_count: None,
            children: Vec::new(),
        }
    }

    /// Set the interaction count
    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.interaction_count = Some(count);
        self
    }

    /// Append a child
    #[must_use]
    pub fn with_child(mut self, child: PathwayNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check for children
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PathwayNode::node_count).sum::<usize>()
    }

    /// Sum of the counts shown in this subtree, saturating at `u64::MAX`
    #[must_use]
    pub fn subtree_interactions(&self) -> u64 {
        self.children
            .iter()
            .map(PathwayNode::subtree_interactions)
            .fold(self.interaction_count.unwrap_or(0), u64::saturating_add)
    }

    /// Deepest nesting below this node (0 for a leaf)
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.max_depth())
            .max()
            .unwrap_or(0)
    }

    /// Find a descendant by path relative to this node's children
    #[must_use]
    pub fn find(&self, relative: &[String]) -> Option<&PathwayNode> {
        let Some((head, rest)) = relative.split_first() else {
            return Some(self);
        };
        self.children
            .iter()
            .find(|c| &c.name == head)
            .and_then(|c| c.find(rest))
    }
}

/// Depth-first, pre-order walk over a forest
///
/// Yields each node with its full path.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(PathwayPath, &'a PathwayNode)>,
}

impl<'a> Walk<'a> {
    /// Walk a forest whose roots sit under `base`
    #[must_use]
    pub fn new(roots: &'a [PathwayNode], base: &PathwayPath) -> Self {
        let stack = roots
            .iter()
            .rev()
            .map(|node| (base.child(node.name.clone()), node))
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (PathwayPath, &'a PathwayNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((path.child(child.name.clone()), child));
        }
        Some((path, node))
    }
}
