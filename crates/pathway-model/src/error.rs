//! Error types for the pathway data model

/// Errors raised while building model values
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Timestamp is not ISO 8601
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// Text that failed to parse
        value: String,
        /// Parser message
        reason: String,
    },

    /// Pathway path could not be parsed
    #[error("invalid path: {0}")]
    InvalidPath(#[from] crate::path::PathError),
}
