//! Report Layer - file ingress and egress
//!
//! The single place where report files are read and written:
//! - File → snapshot parsing (ingress), cached by content hash
//! - Snapshot → file rendering (egress)
//! - Directory scans for snapshot archives

use crate::cache::SnapshotCache;
use crate::config::ReportConfig;
use crate::error::{RenderError, ReportError, ReportResult};
use crate::parser::ReportParser;
use crate::render::ReportRenderer;
use pathway_model::{ContentHash, ReportSnapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Extensions recognised as report files
pub const REPORT_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Source file metadata
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// File path
    pub path: PathBuf,
    /// Last modified time, when the filesystem reports one
    pub modified: Option<SystemTime>,
    /// Hash of the raw file text
    pub checksum: ContentHash,
}

/// Result of loading a report file
#[derive(Debug, Clone)]
pub struct LoadedReport {
    /// The parsed snapshot
    pub snapshot: Arc<ReportSnapshot>,
    /// Source file metadata
    pub metadata: SourceMetadata,
    /// Whether the snapshot came from the cache
    pub cached: bool,
}

/// Outcome of loading every report in a directory
#[derive(Debug, Default)]
pub struct DirectoryLoad {
    /// Reports that parsed, sorted by path
    pub reports: Vec<LoadedReport>,
    /// Files that failed, sorted by path
    pub failures: Vec<(PathBuf, ReportError)>,
}

/// Reads and writes report files
#[derive(Debug, Clone)]
pub struct ReportLayer {
    parser: ReportParser,
    renderer: ReportRenderer,
    cache: SnapshotCache,
    max_file_size: u64,
}

impl ReportLayer {
    /// Create layer with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&ReportConfig::default())
    }

    /// Create layer from configuration
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            parser: ReportParser::from_config(config),
            renderer: ReportRenderer::from_config(config),
            cache: SnapshotCache::new(config.cache_capacity),
            max_file_size: config.max_file_size,
        }
    }

    /// Load and parse a report file (Ingress)
    ///
    /// # Errors
    /// - `ReportError::Io` if the file cannot be read
    /// - `ReportError::FileTooLarge` above the configured size limit
    /// - `ReportError::Parse` if the text is not a valid report
    pub async fn load(&self, path: impl AsRef<Path>) -> ReportResult<LoadedReport> {
        let path = path.as_ref();

        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| ReportError::io_error(path, e))?;
        if meta.len() > self.max_file_size {
            return Err(ReportError::FileTooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                max: self.max_file_size,
            });
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReportError::io_error(path, e))?;
        let checksum = ContentHash::compute(text.as_bytes());

        let parser = self.parser;
        let (snapshot, cached) = self
            .cache
            .try_get_or_insert_with(checksum, || async move { parser.parse(&text) })
            .await
            .map_err(|e| ReportError::parse_error(path, e))?;

        tracing::debug!(
            path = %path.display(),
            checksum = %checksum.short(),
            cached,
            "loaded report"
        );

        Ok(LoadedReport {
            snapshot,
            metadata: SourceMetadata {
                path: path.to_path_buf(),
                modified: meta.modified().ok(),
                checksum,
            },
            cached,
        })
    }

    /// Load every report file directly inside `dir`
    ///
    /// Files that fail to load are collected rather than aborting the scan.
    ///
    /// # Errors
    /// Returns `ReportError::Io` if the directory itself cannot be listed
    pub async fn load_dir(&self, dir: impl AsRef<Path>) -> ReportResult<DirectoryLoad> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| ReportError::io_error(dir, e))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ReportError::io_error(dir, e))?
        {
            let path = entry.path();
            if is_report_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut load = DirectoryLoad::default();
        for path in paths {
            match self.load(&path).await {
                Ok(report) => load.reports.push(report),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping report");
                    load.failures.push((path, err));
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            loaded = load.reports.len(),
            failed = load.failures.len(),
            "scanned report directory"
        );
        Ok(load)
    }

    /// Render snapshot to text
    ///
    /// # Errors
    /// Returns `RenderError::UnrepresentableName` for a name the report
    /// format cannot carry
    #[inline]
    pub fn render(&self, snapshot: &ReportSnapshot) -> Result<String, RenderError> {
        self.renderer.render(snapshot)
    }

    /// Render and write snapshot to file (Egress)
    ///
    /// # Errors
    /// Returns `RenderError::Io` if the file cannot be written, or
    /// `RenderError::UnrepresentableName` before anything is written
    pub async fn store(&self, snapshot: &ReportSnapshot, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let text = self.renderer.render(snapshot)?;
        tokio::fs::write(path, text.as_bytes())
            .await
            .map_err(|e| RenderError::io_error(path, e))?;
        tracing::debug!(path = %path.display(), pathways = snapshot.total_pathways, "wrote report");
        Ok(())
    }

    /// Parser used by this layer
    #[inline]
    #[must_use]
    pub fn parser(&self) -> &ReportParser {
        &self.parser
    }

    /// Get cache reference
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }
}

impl Default for ReportLayer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_report_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| REPORT_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_from_config() {
        let layer = ReportLayer::from_config(&ReportConfig::new().with_indent_width(4));
        assert_eq!(layer.parser().indent_width(), 4);
        assert_eq!(layer.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn report_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("snap.md");
        let json = dir.path().join("snap.json");
        std::fs::write(&md, "x").unwrap();
        std::fs::write(&json, "x").unwrap();
        assert!(is_report_file(&md));
        assert!(!is_report_file(&json));
        assert!(!is_report_file(&dir.path().join("missing.md")));
    }
}
