//! Error types for document loading, condition parsing and tool operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all embed operations
#[derive(Debug)]
pub enum EmbedError {
    /// No document exists for the requested embed name
    NotFound {
        /// Embed name as written in the prompt
        name: String,
        /// Primary location that was checked
        path: PathBuf,
    },

    /// Document exists but does not match the tag document shape
    InvalidFormat {
        /// Path of the offending document
        path: PathBuf,
        /// Description of what failed to parse
        reason: String,
    },

    /// Condition references a group absent from the tagset
    UnknownGroup {
        /// Name of the missing group
        group: String,
    },

    /// Condition clause could not be parsed
    MalformedCondition {
        /// Clause text as written
        clause: String,
        /// Explanation of the syntax problem
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name, path } => {
                write!(
                    f,
                    "No embed document for '{name}' (looked for '{}')",
                    path.display()
                )
            }
            Self::InvalidFormat { path, reason } => {
                write!(f, "Invalid embed document '{}': {reason}", path.display())
            }
            Self::UnknownGroup { group } => {
                write!(f, "Unknown tag group '{group}'")
            }
            Self::MalformedCondition { clause, reason } => {
                write!(f, "Malformed condition clause '{clause}': {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for EmbedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for embed results
pub type Result<T> = std::result::Result<T, EmbedError>;

impl From<std::io::Error> for EmbedError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid format error
pub fn invalid_format(path: impl Into<PathBuf>, reason: &impl ToString) -> EmbedError {
    EmbedError::InvalidFormat {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> EmbedError {
    EmbedError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path and operation
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> EmbedError {
    EmbedError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
