//! Error types for the report format
//!
//! Provides error handling for:
//! - Parse operations (text → snapshot), located by line
//! - Render operations (snapshot → file)
//! - File-level loading (I/O, size limits)

use std::path::PathBuf;

/// Errors while parsing report text
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A required header line is absent
    #[error("line {line}: expected header '{expected}'")]
    MissingHeader {
        /// Header expected at this position
        expected: String,
        /// Line where it was expected
        line: usize,
    },

    /// Header line present but its value is unusable
    #[error("line {line}: invalid header: {message}")]
    InvalidHeader {
        /// Header line
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Indentation is not a multiple of the indent width
    #[error("line {line}: indentation of {indent} spaces is not a multiple of {width}")]
    InvalidIndent {
        /// Entry line
        line: usize,
        /// Leading spaces found
        indent: usize,
        /// Configured indent width
        width: usize,
    },

    /// Tab characters used for indentation
    #[error("line {line}: tab characters are not allowed in indentation")]
    TabIndent {
        /// Entry line
        line: usize,
    },

    /// Entry nested more than one level below its predecessor
    #[error("line {line}: depth {found} exceeds maximum {expected_max} at this point")]
    DepthJump {
        /// Entry line
        line: usize,
        /// Deepest depth allowed here
        expected_max: usize,
        /// Depth found
        found: usize,
    },

    /// Body line that is neither blank nor a bullet entry
    #[error("line {line}: malformed entry '{text}'")]
    MalformedEntry {
        /// Offending line
        line: usize,
        /// Line text
        text: String,
    },

    /// Count suffix is not a non-negative integer
    #[error("line {line}: invalid interaction count '{text}'")]
    InvalidCount {
        /// Entry line
        line: usize,
        /// Count text
        text: String,
    },
}

impl ParseError {
    /// Line the error refers to
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MissingHeader { line, .. }
            | Self::InvalidHeader { line, .. }
            | Self::InvalidIndent { line, .. }
            | Self::TabIndent { line }
            | Self::DepthJump { line, .. }
            | Self::MalformedEntry { line, .. }
            | Self::InvalidCount { line, .. } => *line,
        }
    }
}

/// Errors while rendering or writing a report
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// IO error during file write
    #[error("io error writing {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Formatting failed
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Name that would read back differently from the report text
    #[error("pathway name {name:?} cannot be written as a report entry")]
    UnrepresentableName {
        /// Offending name
        name: String,
    },
}

impl RenderError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while loading report files
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// File content failed to parse
    #[error("{path}: {source}")]
    Parse {
        /// Source file
        path: PathBuf,
        /// Located parse error
        #[source]
        source: ParseError,
    },

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Source file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit
    #[error("{path}: file too large: {size} bytes (max: {max})")]
    FileTooLarge {
        /// Source file
        path: PathBuf,
        /// File size
        size: u64,
        /// Configured limit
        max: u64,
    },

    /// Rendering failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl ReportError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a path to a parse error
    pub fn parse_error(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::InvalidIndent {
            line: 7,
            indent: 3,
            width: 2,
        };
        assert_eq!(
            err.to_string(),
            "line 7: indentation of 3 spaces is not a multiple of 2"
        );
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn report_error_carries_path() {
        let err = ReportError::parse_error("snap.md", ParseError::TabIndent { line: 4 });
        assert_eq!(
            err.to_string(),
            "snap.md: line 4: tab characters are not allowed in indentation"
        );
    }

    #[test]
    fn render_error_conversion() {
        let err: ReportError = RenderError::Format(std::fmt::Error).into();
        assert!(matches!(err, ReportError::Render(_)));
    }
}
