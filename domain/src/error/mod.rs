//! Domain error taxonomy
//!
//! Every failure that reaches a user is expressed as a [`PrismError`]: a
//! human message, an [`ErrorKind`] tag, an optional underlying cause and a
//! list of remediation suggestions. [`classify`] turns arbitrary failures
//! into this shape.

pub mod classify;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classify::{ClassifyContext, Failure, OsErrorCode, OsFailure, classify};

/// Boxed underlying error kept as the `source()` of a [`PrismError`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category surfaced to callers, status records and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Config,
    Api,
    Network,
    FileSystem,
    Permission,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Config => "config",
            ErrorCategory::Api => "api",
            ErrorCategory::Network => "network",
            ErrorCategory::FileSystem => "file_system",
            ErrorCategory::Permission => "permission",
            ErrorCategory::Unknown => "unknown",
        }
    }

    /// Display label, e.g. `ConfigError`
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Config => "ConfigError",
            ErrorCategory::Api => "ApiError",
            ErrorCategory::Network => "NetworkError",
            ErrorCategory::FileSystem => "FileSystemError",
            ErrorCategory::Permission => "PermissionError",
            ErrorCategory::Unknown => "UnknownError",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Precise kind of a domain error.
///
/// `ModelSelection` is a specialization of configuration errors: it keeps
/// its own tag for matching but reports [`ErrorCategory::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    ModelSelection,
    Api,
    Network,
    FileSystem,
    Permission,
    Unknown,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::Config | ErrorKind::ModelSelection => ErrorCategory::Config,
            ErrorKind::Api => ErrorCategory::Api,
            ErrorKind::Network => ErrorCategory::Network,
            ErrorKind::FileSystem => ErrorCategory::FileSystem,
            ErrorKind::Permission => ErrorCategory::Permission,
            ErrorKind::Unknown => ErrorCategory::Unknown,
        }
    }
}

/// A classified, user-facing error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PrismError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<BoxedCause>,
    suggestions: Vec<String>,
    examples: Vec<String>,
}

impl PrismError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            suggestions: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn model_selection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModelSelection, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn file_system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileSystem, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permission, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    pub fn with_cause(mut self, cause: impl Into<BoxedCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub(crate) fn with_boxed_cause(mut self, cause: Option<BoxedCause>) -> Self {
        self.cause = cause;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions.extend(suggestions.into_iter().map(Into::into));
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_model_selection_surfaces_as_config() {
        let err = PrismError::model_selection("no such model");
        assert_eq!(err.kind(), ErrorKind::ModelSelection);
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_display_is_message() {
        let err = PrismError::network("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_cause_is_exposed_as_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = PrismError::file_system("write failed").with_cause(io);
        assert_eq!(err.source().unwrap().to_string(), "disk on fire");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_suggestions_and_examples_accumulate() {
        let err = PrismError::config("bad")
            .with_suggestion("one")
            .with_suggestions(["two", "three"])
            .with_example("prism -m openai:gpt-4o \"hi\"");
        assert_eq!(err.suggestions(), ["one", "two", "three"]);
        assert_eq!(err.examples().len(), 1);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ErrorCategory::FileSystem.label(), "FileSystemError");
        assert_eq!(ErrorCategory::Permission.to_string(), "PermissionError");
        assert_eq!(ErrorCategory::Api.as_str(), "api");
    }
}
