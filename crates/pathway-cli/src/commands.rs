//! Subcommand implementations
//!
//! Each command writes its output to the given sink so the binary can pass
//! stdout and tests can pass a buffer.

use crate::config::CliConfig;
use anyhow::{bail, Context as _};
use pathway_hierarchy::{CountMode, HierarchyDocument, HierarchyGraph};
use pathway_model::{GeneratedAt, ReportSnapshot, SnapshotDelta};
use pathway_report::{lint, ReportLayer, SnapshotHistory};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Options for `hierarchy render`
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Write the report here instead of the output sink
    pub out: Option<PathBuf>,
    /// Remove dead pathways first
    pub prune: bool,
    /// Attach orphans to the fallback root first
    pub fix_orphans: bool,
    /// Header timestamp; now when absent
    pub generated: Option<GeneratedAt>,
    /// Overrides the configured count mode
    pub count_mode: Option<CountMode>,
}

/// Shared state for all subcommands
#[derive(Debug, Clone)]
pub struct App {
    config: CliConfig,
    layer: ReportLayer,
}

impl App {
    /// Create from configuration
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let layer = ReportLayer::from_config(&config.report);
        Self { config, layer }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    async fn load(&self, path: &Path) -> anyhow::Result<ReportSnapshot> {
        let loaded = self
            .layer
            .load(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?;
        Ok((*loaded.snapshot).clone())
    }

    /// `parse`: print a summary of a report, or the snapshot as JSON
    ///
    /// # Errors
    /// Returns error if the report cannot be loaded
    pub async fn parse<W: Write>(&self, path: &Path, json: bool, out: &mut W) -> anyhow::Result<()> {
        let snapshot = self.load(path).await?;
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
            return Ok(());
        }

        writeln!(out, "{}", path.display())?;
        writeln!(out, "  generated:      {}", snapshot.generated_at)?;
        writeln!(out, "  total declared: {}", snapshot.total_pathways)?;
        writeln!(out, "  distinct:       {}", snapshot.computed_total())?;
        writeln!(out, "  entries:        {}", snapshot.node_count())?;
        writeln!(out, "  interactions:   {}", snapshot.total_interactions())?;
        writeln!(out, "  max depth:      {}", snapshot.max_depth())?;
        writeln!(out, "  roots:")?;
        for root in &snapshot.roots {
            writeln!(
                out,
                "    - {}: {} entries, {} interactions",
                root.name,
                root.node_count(),
                root.subtree_interactions()
            )?;
        }
        Ok(())
    }

    /// `lint`: print findings; returns false when any is an error
    ///
    /// # Errors
    /// Returns error if the report cannot be loaded
    pub async fn lint<W: Write>(
        &self,
        path: &Path,
        strict_total: bool,
        json: bool,
        out: &mut W,
    ) -> anyhow::Result<bool> {
        let snapshot = self.load(path).await?;
        let config = self
            .config
            .report
            .clone()
            .with_strict_total(strict_total || self.config.report.strict_total);
        let report = lint(&snapshot, &config);

        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            for issue in &report.issues {
                writeln!(out, "{}: {issue}", path.display())?;
            }
            writeln!(
                out,
                "{} error(s), {} warning(s)",
                report.count(pathway_report::Severity::Error),
                report.count(pathway_report::Severity::Warning)
            )?;
        }
        tracing::info!(path = %path.display(), issues = report.issues.len(), "linted report");
        Ok(!report.has_errors())
    }

    /// `fmt`: re-render a report canonically, in place or to the sink
    ///
    /// # Errors
    /// Returns error if the report cannot be loaded or written
    pub async fn fmt<W: Write>(&self, path: &Path, write: bool, recount: bool, out: &mut W) -> anyhow::Result<()> {
        let mut snapshot = self.load(path).await?;
        if recount {
            snapshot = snapshot.with_computed_total();
        }
        if write {
            self.layer
                .store(&snapshot, path)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "formatted report");
        } else {
            out.write_all(self.layer.render(&snapshot)?.as_bytes())?;
        }
        Ok(())
    }

    /// `diff`: print the delta from `old` to `new`
    ///
    /// # Errors
    /// Returns error if either report cannot be loaded
    pub async fn diff<W: Write>(&self, old: &Path, new: &Path, json: bool, out: &mut W) -> anyhow::Result<()> {
        let older = self.load(old).await?;
        let newer = self.load(new).await?;
        let delta = SnapshotDelta::between(&older, &newer);
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&delta)?)?;
        } else {
            write!(out, "{delta}")?;
        }
        Ok(())
    }

    /// `history`: summarise every report in a directory and diff neighbours
    ///
    /// # Errors
    /// Returns error if the directory cannot be read or holds no valid report
    pub async fn history<W: Write>(&self, dir: &Path, dedup: bool, json: bool, out: &mut W) -> anyhow::Result<()> {
        let load = self
            .layer
            .load_dir(dir)
            .await
            .with_context(|| format!("failed to scan {}", dir.display()))?;
        if load.reports.is_empty() {
            bail!("no readable reports in {}", dir.display());
        }

        let mut history = SnapshotHistory::new();
        for report in load.reports {
            history.push(report.metadata.path.display().to_string(), report.snapshot);
        }
        let dropped = if dedup { history.dedup() } else { 0 };
        let summary = history.summary();
        let deltas = history.deltas();
        let skipped: Vec<String> = load.failures.iter().map(|(p, _)| p.display().to_string()).collect();

        if json {
            let doc = serde_json::json!({
                "generations": summary,
                "deltas": deltas,
                "dropped": dropped,
                "skipped": skipped,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            return Ok(());
        }

        for stats in &summary {
            writeln!(
                out,
                "{}  {}  total {}  distinct {}  entries {}  interactions {}  depth {}  {}",
                stats.generated_at,
                stats.source,
                stats.declared_total,
                stats.distinct_pathways,
                stats.nodes,
                stats.interactions,
                stats.max_depth,
                stats.body_hash.short()
            )?;
        }
        if dedup {
            writeln!(out, "dropped {dropped} unchanged generation(s)")?;
        }
        for path in &skipped {
            writeln!(out, "skipped {path}")?;
        }
        for delta in &deltas {
            writeln!(out)?;
            write!(out, "{delta}")?;
        }
        Ok(())
    }

    fn graph(&self, doc: &Path, fix_orphans: bool) -> anyhow::Result<HierarchyGraph> {
        let document = HierarchyDocument::load(doc)?;
        let mut graph = HierarchyGraph::from_document(&document)
            .with_context(|| format!("invalid hierarchy in {}", doc.display()))?;
        if fix_orphans {
            graph.fix_orphans(&self.config.hierarchy);
        }
        Ok(graph)
    }

    /// `hierarchy validate`: print stats and findings; returns validity
    ///
    /// # Errors
    /// Returns error if the document cannot be loaded or linked
    pub fn hierarchy_validate<W: Write>(
        &self,
        doc: &Path,
        fix_orphans: bool,
        json: bool,
        out: &mut W,
    ) -> anyhow::Result<bool> {
        let graph = self.graph(doc, fix_orphans)?;
        let report = graph.validate(&self.config.hierarchy);

        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            return Ok(report.valid);
        }

        let stats = &report.stats;
        writeln!(
            out,
            "pathways:     {} ({} root, {} main, {} sibling)",
            stats.total_pathways, stats.root_pathways, stats.main_pathways, stats.sibling_pathways
        )?;
        writeln!(
            out,
            "interactions: {} ({} assignments)",
            stats.total_interactions, stats.assigned_interactions
        )?;
        for finding in &report.findings {
            writeln!(out, "{finding}")?;
        }
        writeln!(out, "{}", if report.valid { "VALID" } else { "INVALID" })?;
        Ok(report.valid)
    }

    /// `hierarchy render`: build a report from a hierarchy document
    ///
    /// # Errors
    /// Returns error if the document cannot be loaded, is cyclic, or the
    /// report cannot be written
    pub async fn hierarchy_render<W: Write>(&self, doc: &Path, options: RenderOptions, out: &mut W) -> anyhow::Result<()> {
        let mut graph = self.graph(doc, options.fix_orphans)?;
        if options.prune {
            graph.prune_dead(&self.config.hierarchy);
        }

        let mut config = self.config.hierarchy.clone();
        if let Some(mode) = options.count_mode {
            config = config.with_count_mode(mode);
        }
        let generated = options.generated.unwrap_or_else(GeneratedAt::now);
        let snapshot = graph.build_snapshot(&config, generated)?;

        match options.out {
            Some(path) => {
                self.layer
                    .store(&snapshot, &path)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                writeln!(out, "wrote {} ({} pathways)", path.display(), snapshot.total_pathways)?;
            }
            None => out.write_all(self.layer.render(&snapshot)?.as_bytes())?,
        }
        Ok(())
    }
}
