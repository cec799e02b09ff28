//! Report format configuration

use serde::{Deserialize, Serialize};

/// Default spaces per nesting level
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Options shared by the parser, renderer, lint and file layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Spaces per nesting level
    pub indent_width: usize,
    /// Treat a declared total that disagrees with the body as an error
    pub strict_total: bool,
    /// Largest report file accepted (bytes)
    pub max_file_size: u64,
    /// Parsed snapshots kept in the cache
    pub cache_capacity: u64,
}

impl ReportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With indent width (zero is clamped to one)
    #[inline]
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// With strict total checking
    #[inline]
    #[must_use]
    pub fn with_strict_total(mut self, strict: bool) -> Self {
        self.strict_total = strict;
        self
    }

    /// With maximum file size
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            strict_total: false,
            max_file_size: 10 * 1024 * 1024, // 10MB
            cache_capacity: 1_000,
        }
    }
}
