//! Error types for diff header parsing.
//!
//! Uses thiserror for derive macros. Parse errors always carry the absolute
//! line number of the offending input line.

use thiserror::Error;

/// Main error type for header parsing.
#[derive(Error, Debug)]
pub enum HeaderError {
    /// The input looked like a file header but a line failed validation.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending line.
        line: usize,
        message: String,
    },

    /// The underlying line source failed while fetching more input.
    #[error("failed to read patch: {0}")]
    Io(#[from] std::io::Error),

    /// No further line exists.
    #[error("unexpected end of input")]
    Eof,

    /// Configuration could not be loaded or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HeaderError {
    /// Returns the line number for located errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            HeaderError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Returns true if this is the end-of-input signal rather than a failure.
    pub fn is_eof(&self) -> bool {
        matches!(self, HeaderError::Eof)
    }
}

/// Result type alias for header parsing.
pub type Result<T> = std::result::Result<T, HeaderError>;
