//! Report text parser
//!
//! Reads the "Pathway Hierarchy Tree" layout:
//!
//! ```text
//! # Pathway Hierarchy Tree
//! # Generated: 2025-01-12T10:23:45.123456
//! # Total pathways: 3
//!
//! - Cell Death
//!   - Apoptosis (12 interactions)
//!     - Caspase Activation (3 interactions)
//! ```
//!
//! Every structural problem is reported with its 1-based line number.

use crate::config::{ReportConfig, DEFAULT_INDENT_WIDTH};
use crate::error::ParseError;
use once_cell::sync::Lazy;
use pathway_model::{GeneratedAt, PathwayNode, ReportSnapshot};
use regex::Regex;

/// First header line
pub const TITLE_HEADER: &str = "# Pathway Hierarchy Tree";
/// Prefix of the timestamp header
pub const GENERATED_PREFIX: &str = "# Generated:";
/// Prefix of the total header
pub const TOTAL_PREFIX: &str = "# Total pathways:";

// Literal patterns; compilation cannot fail.
static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)-(?: (?P<rest>.*))?$").expect("entry pattern")
});
pub(crate) static COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*?) \((?P<count>[^()\s]+) interactions?\)$").expect("count pattern")
});

/// Parser for report text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportParser {
    indent_width: usize,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser {
    /// Parser with the default two-space indentation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Parser configured from report options
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

    /// Spaces per nesting level
    #[inline]
    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Parse report text into a snapshot
    ///
    /// # Errors
    /// - `MissingHeader` / `InvalidHeader` for a bad header block
    /// - `InvalidIndent`, `TabIndent`, `DepthJump` for bad nesting
    /// - `MalformedEntry`, `InvalidCount` for bad bullet lines
    pub fn parse(&self, text: &str) -> Result<ReportSnapshot, ParseError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end()))
            .skip_while(|(_, line)| line.is_empty());
        let mut last_line = 0;
        let mut next_header = |expected: &str| match lines.next() {
            Some((no, line)) => {
                last_line = no;
                Ok((no, line))
            }
            None => Err(ParseError::MissingHeader {
                expected: expected.to_string(),
                line: last_line + 1,
            }),
        };

        let (no, title) = next_header(TITLE_HEADER)?;
        if title.trim() != TITLE_HEADER {
            return Err(ParseError::MissingHeader {
                expected: TITLE_HEADER.to_string(),
                line: no,
            });
        }

        let (no, generated) = next_header(GENERATED_PREFIX)?;
        let generated_at = header_value(generated, GENERATED_PREFIX, no)?
            .parse::<GeneratedAt>()
            .map_err(|e| ParseError::InvalidHeader {
                line: no,
                message: e.to_string(),
            })?;

        let (no, total) = next_header(TOTAL_PREFIX)?;
        let total_text = header_value(total, TOTAL_PREFIX, no)?;
        let total_pathways = total_text
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidHeader {
                line: no,
                message: format!("total pathways '{total_text}' is not a non-negative integer"),
            })?;

        let mut builder = ForestBuilder::default();
        for (no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (depth, node) = self.parse_entry(no, line)?;
            if depth > builder.open_depth() {
                return Err(ParseError::DepthJump {
                    line: no,
                    expected_max: builder.open_depth(),
                    found: depth,
                });
            }
            builder.push(depth, node);
        }

        Ok(ReportSnapshot {
            generated_at,
            total_pathways,
            roots: builder.finish(),
        })
    }

    fn parse_entry(&self, no: usize, line: &str) -> Result<(usize, PathwayNode), ParseError> {
        let caps = ENTRY_RE
            .captures(line)
            .ok_or_else(|| ParseError::MalformedEntry {
                line: no,
                text: line.to_string(),
            })?;

        let indent = caps.name("indent").map_or("", |m| m.as_str());
        if indent.contains('\t') {
            return Err(ParseError::TabIndent { line: no });
        }
        if indent.len() % self.indent_width != 0 {
            return Err(ParseError::InvalidIndent {
                line: no,
                indent: indent.len(),
                width: self.indent_width,
            });
        }

        let rest = caps.name("rest").map_or("", |m| m.as_str());
        let node = match COUNT_RE.captures(rest) {
            Some(entry) => {
                let count_text = &entry["count"];
                let count = count_text
                    .parse::<u64>()
                    .map_err(|_| ParseError::InvalidCount {
                        line: no,
                        text: count_text.to_string(),
                    })?;
                PathwayNode::leaf(entry["name"].trim()).with_count(count)
            }
            None => PathwayNode::leaf(rest.trim()),
        };

        Ok((indent.len() / self.indent_width, node))
    }
}

fn header_value<'a>(line: &'a str, prefix: &str, no: usize) -> Result<&'a str, ParseError> {
    line.trim_start()
        .strip_prefix(prefix)
        .map(str::trim)
        .ok_or_else(|| ParseError::MissingHeader {
            expected: prefix.to_string(),
            line: no,
        })
}

/// Assembles a forest from entries given in pre-order with their depths
#[derive(Debug, Default)]
struct ForestBuilder {
    open: Vec<PathwayNode>,
    roots: Vec<PathwayNode>,
}

impl ForestBuilder {
    /// Deepest depth the next entry may take
    fn open_depth(&self) -> usize {
        self.open.len()
    }

    fn push(&mut self, depth: usize, node: PathwayNode) {
        while self.open.len() > depth {
            self.close();
        }
        self.open.push(node);
    }

    fn close(&mut self) {
        if let Some(node) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.roots.push(node),
            }
        }
    }

    fn finish(mut self) -> Vec<PathwayNode> {
        while !self.open.is_empty() {
            self.close();
        }
        self.roots
    }
}
