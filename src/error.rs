/*!
 * Error types for the livery CLI
 */

use livery_core_manifest::Error as ManifestError;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, LiveryError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Debug)]
pub enum LiveryError {
    /// Configuration file or flag error
    Config(String),

    /// Manifest build failure
    Manifest(ManifestError),

    /// I/O error outside the manifest pipeline (log file, config file)
    Io(io::Error),
}

impl LiveryError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // Contributor-fixable problems in the metadata itself
            LiveryError::Manifest(e) if e.is_content_error() => EXIT_REJECTED,
            _ => EXIT_FATAL,
        }
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> ErrorCategory {
        match self {
            LiveryError::Config(_) => ErrorCategory::Configuration,
            LiveryError::Io(_) => ErrorCategory::IoError,
            LiveryError::Manifest(e) => match e {
                ManifestError::Validation { .. } => ErrorCategory::Validation,
                ManifestError::DuplicateId { .. } => ErrorCategory::Conflict,
                ManifestError::Parse { .. } => ErrorCategory::Syntax,
                ManifestError::Io { .. } => ErrorCategory::IoError,
                ManifestError::Pattern { .. } => ErrorCategory::Configuration,
                ManifestError::Json(_) => ErrorCategory::Serialization,
            },
        }
    }

    /// A short hint telling a contributor how to fix the problem
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            LiveryError::Manifest(ManifestError::Validation { .. }) => {
                Some("Fix the named field in the metadata file and run the build again")
            }
            LiveryError::Manifest(ManifestError::DuplicateId { .. }) => {
                Some("Every livery needs its own id; rename the id in one of the files")
            }
            LiveryError::Manifest(ManifestError::Parse { .. }) => {
                Some("The file is not valid JSON; check for trailing commas or missing quotes")
            }
            LiveryError::Manifest(ManifestError::Pattern { .. }) => {
                Some("Use a file-name glob such as \"*.meta.json\"")
            }
            _ => None,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Metadata field missing or wrongly typed
    Validation,
    /// Two metadata files share an id
    Conflict,
    /// Metadata file is not valid JSON
    Syntax,
    /// I/O operation errors
    IoError,
    /// Configuration errors
    Configuration,
    /// Manifest serialization errors
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Conflict => write!(f, "conflict"),
            ErrorCategory::Syntax => write!(f, "syntax"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Serialization => write!(f, "serialization"),
        }
    }
}

impl fmt::Display for LiveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveryError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            LiveryError::Manifest(err) => {
                write!(f, "{}", err)
            }
            LiveryError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for LiveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LiveryError::Manifest(err) => Some(err),
            LiveryError::Io(err) => Some(err),
            LiveryError::Config(_) => None,
        }
    }
}

impl From<ManifestError> for LiveryError {
    fn from(err: ManifestError) -> Self {
        LiveryError::Manifest(err)
    }
}

impl From<io::Error> for LiveryError {
    fn from(err: io::Error) -> Self {
        LiveryError::Io(err)
    }
}
