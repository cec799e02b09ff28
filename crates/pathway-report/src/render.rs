//! Report text renderer
//!
//! Writes a [`ReportSnapshot`] back in the canonical layout: three header
//! lines, then each root-level tree preceded by a blank line.

use crate::config::{ReportConfig, DEFAULT_INDENT_WIDTH};
use crate::error::RenderError;
use crate::parser::{COUNT_RE, GENERATED_PREFIX, TITLE_HEADER, TOTAL_PREFIX};
use pathway_model::{PathwayNode, ReportSnapshot};
use std::fmt::Write;

/// Renderer for report text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRenderer {
    indent_width: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    /// Renderer with the default two-space indentation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Renderer configured from report options
    #[inline]
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new().with_indent_width(config.indent_width)
    }

    /// With indent width (zero is clamped to one)
    #[inline]
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Render a snapshot to a string
    ///
    /// # Errors
    /// Returns `RenderError::UnrepresentableName` for a name that would not
    /// parse back as itself
    pub fn render(&self, snapshot: &ReportSnapshot) -> Result<String, RenderError> {
        let mut out = String::with_capacity(64 + snapshot.node_count() * 32);
        self.write_to(&mut out, snapshot)?;
        Ok(out)
    }

    /// Render a snapshot into any formatter sink
    ///
    /// # Errors
    /// Returns error if the sink rejects a write or a name cannot be
    /// represented
    pub fn write_to<W: Write>(&self, out: &mut W, snapshot: &ReportSnapshot) -> Result<(), RenderError> {
        writeln!(out, "{TITLE_HEADER}")?;
        writeln!(out, "{GENERATED_PREFIX} {}", snapshot.generated_at)?;
        writeln!(out, "{TOTAL_PREFIX} {}", snapshot.total_pathways)?;
        for root in &snapshot.roots {
            writeln!(out)?;
            self.write_node(out, root, 0)?;
        }
        Ok(())
    }

    fn write_node<W: Write>(&self, out: &mut W, node: &PathwayNode, depth: usize) -> Result<(), RenderError> {
        if !representable(node) {
            return Err(RenderError::UnrepresentableName {
                name: node.name.clone(),
            });
        }
        let indent = depth * self.indent_width;
        write!(out, "{:indent$}- {}", "", node.name)?;
        if let Some(count) = node.interaction_count {
            write!(out, " ({count} interactions)")?;
        }
        writeln!(out)?;
        for child in &node.children {
            self.write_node(out, child, depth + 1)?;
        }
        Ok(())
    }
}

/// Whether an entry for `node` parses back to the same name and count
///
/// Names must be trimmed and free of control characters. Without a count,
/// a name ending in a count suffix would be read as one.
#[must_use]
pub fn representable(node: &PathwayNode) -> bool {
    let name = node.name.as_str();
    name.trim() == name
        && !name.chars().any(char::is_control)
        && (node.interaction_count.is_some() || !COUNT_RE.is_match(name))
}
