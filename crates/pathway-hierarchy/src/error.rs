//! Error types for hierarchy documents and graphs

use crate::document::DocumentFormat;
use std::path::PathBuf;

/// Hierarchy errors
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// A parent link names a pathway that is not in the document
    #[error("pathway '{pathway}' names unknown parent '{parent}'")]
    UnknownParent {
        /// Child pathway
        pathway: String,
        /// Missing parent
        parent: String,
    },

    /// Parent links form a cycle
    #[error("cycle detected among: {}", members.join(", "))]
    CycleDetected {
        /// Pathways on the cycle, sorted by name
        members: Vec<String>,
    },

    /// Document text could not be decoded
    #[error("invalid {format} document: {message}")]
    Decode {
        /// Format that was attempted
        format: DocumentFormat,
        /// Decoder message
        message: String,
    },

    /// I/O error reading a document
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl HierarchyError {
    /// Create I/O error with path context
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for hierarchy operations
pub type HierarchyResult<T> = Result<T, HierarchyError>;
