//! Configuration validation issues
//!
//! Validation never fails fast: every problem found is returned as a
//! [`ConfigIssue`] so callers can print them all at once and decide
//! whether to continue (warnings) or stop (errors).

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    EmptyProvider,
    EmptyModelId,
    DuplicateModel { key: String },
    EmptyGroup { group: String },
    UnknownGroupMember { group: String, key: String },
    /// A group lists the same config key twice
    DuplicateGroupMember { group: String, key: String },
    /// `timeout_seconds = 0`
    InvalidTimeout,
    /// `max_concurrency = 0`
    InvalidConcurrency,
    UnknownProviderKind { provider: String, kind: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(severity: Severity, code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
