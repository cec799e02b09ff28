//! Pathway Report Layer
//!
//! The boundary between report files and the in-memory snapshot model.
//!
//! # Core Operations
//!
//! - **Ingress**: parse report text into a [`ReportSnapshot`](pathway_model::ReportSnapshot)
//! - **Egress**: render a snapshot back to the canonical text layout
//! - **Lint**: format-level checks a parser cannot make line by line
//! - **History**: order generations, drop unchanged ones, diff neighbours
//!
//! # Architecture
//!
//! ```text
//! report.md → ReportParser → ReportSnapshot → ReportRenderer → report.md
//!                  ↑___________↓
//!                 SnapshotCache (content-addressed)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pathway_report::ReportLayer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let layer = ReportLayer::new();
//! let loaded = layer.load("reports/pathway_tree.md").await?;
//! println!("{} pathways", loaded.snapshot.total_pathways);
//! layer.store(&loaded.snapshot, "reports/normalized.md").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod layer;
pub mod lint;
pub mod parser;
pub mod render;

pub use cache::{CacheStats, SnapshotCache};
pub use config::ReportConfig;
pub use error::{ParseError, RenderError, ReportError, ReportResult};
pub use history::{HistoryEntry, SnapshotHistory, SnapshotStats};
pub use layer::{DirectoryLoad, LoadedReport, ReportLayer, SourceMetadata};
pub use lint::{lint, LintIssue, LintKind, LintReport, Severity};
pub use parser::ReportParser;
pub use render::ReportRenderer;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with report files
    pub use crate::config::ReportConfig;
    pub use crate::error::{ParseError, ReportError};
    pub use crate::layer::ReportLayer;
    pub use crate::lint::{lint, LintReport};
    pub use crate::parser::ReportParser;
    pub use crate::render::ReportRenderer;
    pub use pathway_model::{GeneratedAt, PathwayNode, PathwayPath, ReportSnapshot, SnapshotDelta};
}
