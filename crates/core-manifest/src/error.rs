//! Error types for manifest operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a manifest
#[derive(Error, Debug)]
pub enum Error {
    /// A metadata file is missing a required field or has a wrongly-typed one
    #[error("{}: invalid field `{field}`: {reason}", .file.display())]
    Validation {
        file: PathBuf,
        field: String,
        reason: String,
    },

    /// Two or more metadata files share an id
    #[error("duplicate id `{id}` in {}", join_paths(.files))]
    DuplicateId { id: String, files: Vec<PathBuf> },

    /// A metadata file is not syntactically valid JSON
    #[error("{}:{line}:{column}: invalid JSON: {message}", .file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Input directory unreadable or output path unwritable
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest itself could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The metadata naming convention is not a valid glob
    #[error("invalid file pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

impl Error {
    /// Create a validation error for `field` in `file`
    pub fn validation<P, F, R>(file: P, field: F, reason: R) -> Self
    where
        P: Into<PathBuf>,
        F: Into<String>,
        R: Into<String>,
    {
        Error::Validation {
            file: file.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert a `serde_json` syntax error into a positioned parse error
    pub fn parse<P: Into<PathBuf>>(file: P, err: &serde_json::Error) -> Self {
        Error::Parse {
            file: file.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    /// True for errors caused by the submitted metadata rather than the environment
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::DuplicateId { .. } | Error::Parse { .. }
        )
    }

    /// The metadata file this error points at, if it points at exactly one
    pub fn file(&self) -> Option<&Path> {
        match self {
            Error::Validation { file, .. } | Error::Parse { file, .. } => Some(file.as_path()),
            _ => None,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
