//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// Structural failures (parse, IO, missing required declarations) are errors.
/// Unsupported schema values and webhook pattern misses are not: they are
/// logged and reported by the orchestrator instead.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors that carry no path.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A read or write of a specific file failed.
    #[from(ignore)]
    #[display("IO Error on {}: {source}", path.display())]
    File {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying cause.
        source: std::io::Error,
    },

    /// Source text is not well-formed Go.
    #[from(ignore)]
    #[display("Parse Error in {path}: {message}")]
    Parse {
        /// The file (or fragment label) being parsed.
        path: String,
        /// Location and description of the first syntax error.
        message: String,
    },

    /// A declaration that must exist was not found.
    #[from(ignore)]
    #[display("Target Not Found: {_0}")]
    TargetNotFound(String),

    /// More than one declaration matched a lookup that must be unique.
    #[from(ignore)]
    #[display("Ambiguous Target: {_0}")]
    AmbiguousTarget(String),

    /// The operator request could not be decoded.
    #[from(ignore)]
    #[display("Request Error: {_0}")]
    Request(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl AppError {
    /// Wraps an IO error together with the path that caused it.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// Builds a parse error for the given file label.
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) | AppError::File { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
