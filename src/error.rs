use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for the ctxbuild library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Project root does not exist.
    #[error("Project root '{path}' does not exist")]
    NotFound {
        /// The missing root path
        path: PathBuf,
    },

    /// Project root exists but is not a directory.
    #[error("Project root '{path}' is not a directory")]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// The project root itself could not be read.
    ///
    /// Unreadable *subtrees* below the root are recovered and recorded in
    /// the analysis instead of raising this error.
    #[error("Permission denied reading project root '{path}': {message}")]
    Permission {
        /// Path where access was denied
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A required task field is missing or blank.
    #[error("Task '{kind}' is missing required field '{field}'")]
    MissingField {
        /// Task kind id (e.g. "add-feature")
        kind: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// The task kind is not one of the five recognized kinds.
    #[error("Unknown task kind '{kind}' (expected one of: add-feature, change-functionality, explain-functionality, explain-architecture, debug-error)")]
    UnknownTaskKind {
        /// The unrecognized kind string
        kind: String,
    },

    /// Context assembly was requested with no files selected.
    #[error("No files selected for context assembly")]
    EmptySelection,

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Template rendering error.
    #[error("Failed to render template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Error message
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates a not-found error for a missing project root.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a permission error with path context.
    #[must_use]
    pub fn permission(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self::Permission {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a missing-field validation error.
    #[must_use]
    pub fn missing_field(kind: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            kind: kind.into(),
            field,
        }
    }

    /// Creates a template error.
    #[must_use]
    pub fn template(template: impl Into<String>, source: &tera::Error) -> Self {
        Self::Template {
            template: template.into(),
            message: source.to_string(),
        }
    }

    /// Returns true if this is a validation error (task fields, task kind,
    /// or file selection).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::UnknownTaskKind { .. } | Self::EmptySelection
        )
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this error is fatal to the analyze operation.
    #[must_use]
    pub const fn is_analysis_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NotADirectory { .. } | Self::Permission { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::not_found("/tmp/missing");
        assert!(err.is_analysis_fatal());
        assert!(err.to_string().contains("/tmp/missing"));
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let err = Error::missing_field("change-functionality", "desired_behavior");
        assert!(err.is_validation());
        assert!(err.to_string().contains("desired_behavior"));
        assert!(err.to_string().contains("change-functionality"));
    }

    #[test]
    fn test_unknown_kind_lists_valid_kinds() {
        let err = Error::UnknownTaskKind {
            kind: "refactor".to_string(),
        };
        assert!(err.is_validation());
        assert!(err.to_string().contains("refactor"));
        assert!(err.to_string().contains("add-feature"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/test.txt", io_err);
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn test_empty_selection_is_validation() {
        assert!(Error::EmptySelection.is_validation());
    }

    #[test]
    fn test_error_clone() {
        let err = Error::config("test");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }
}
