//! Per-target query status record
//!
//! A record is created `Pending` when the run is set up and moves strictly
//! forward: `Pending -> Running -> (Success | Error)`. Terminal records are
//! never reopened.

use crate::core::timing::elapsed_ms;
use crate::error::{ErrorCategory, PrismError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of a single target within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Pending => "pending",
            QueryStatus::Running => "running",
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryStatus::Success | QueryStatus::Error)
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status transition
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid status transition for {config_key}: {from} -> {to}")]
pub struct StatusTransitionError {
    pub config_key: String,
    pub from: QueryStatus,
    pub to: QueryStatus,
}

/// Ledger entry for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStatusRecord {
    pub config_key: String,
    pub status: QueryStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    /// Remediation hints from the classifier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_suggestions: Vec<String>,
}

impl QueryStatusRecord {
    pub fn pending(config_key: impl Into<String>) -> Self {
        Self {
            config_key: config_key.into(),
            status: QueryStatus::Pending,
            start_time: None,
            end_time: None,
            duration_ms: None,
            error_message: None,
            error_category: None,
            error_suggestions: Vec::new(),
        }
    }

    /// `Pending -> Running`
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), StatusTransitionError> {
        self.transition(QueryStatus::Pending, QueryStatus::Running)?;
        self.start_time = Some(at);
        Ok(())
    }

    /// `Running -> Success`
    pub fn succeed(&mut self, at: DateTime<Utc>) -> Result<(), StatusTransitionError> {
        self.transition(QueryStatus::Running, QueryStatus::Success)?;
        self.finish(at);
        Ok(())
    }

    /// `Running -> Error`
    pub fn fail(
        &mut self,
        at: DateTime<Utc>,
        message: impl Into<String>,
        category: ErrorCategory,
    ) -> Result<(), StatusTransitionError> {
        self.transition(QueryStatus::Running, QueryStatus::Error)?;
        self.finish(at);
        self.error_message = Some(message.into());
        self.error_category = Some(category);
        Ok(())
    }

    /// `Running -> Error` with a classified error's message, category and
    /// suggestions
    pub fn fail_classified(
        &mut self,
        at: DateTime<Utc>,
        error: &PrismError,
    ) -> Result<(), StatusTransitionError> {
        self.fail(at, error.message(), error.category())?;
        self.error_suggestions = error.suggestions().to_vec();
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition(
        &mut self,
        expected: QueryStatus,
        next: QueryStatus,
    ) -> Result<(), StatusTransitionError> {
        if self.status != expected {
            return Err(StatusTransitionError {
                config_key: self.config_key.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    fn finish(&mut self, at: DateTime<Utc>) {
        self.end_time = Some(at);
        self.duration_ms = self.start_time.map(|start| elapsed_ms(start, at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_forward_path_to_success() {
        let now = Utc::now();
        let mut record = QueryStatusRecord::pending("openai:gpt-4o");
        record.start(now).unwrap();
        assert_eq!(record.status, QueryStatus::Running);
        record.succeed(now + Duration::milliseconds(250)).unwrap();
        assert_eq!(record.status, QueryStatus::Success);
        assert_eq!(record.duration_ms, Some(250));
        assert!(record.error_message.is_none());
    }

    #[test]
    fn test_forward_path_to_error() {
        let now = Utc::now();
        let mut record = QueryStatusRecord::pending("openai:gpt-4o");
        record.start(now).unwrap();
        record
            .fail(now, "Request timed out", ErrorCategory::Network)
            .unwrap();
        assert_eq!(record.status, QueryStatus::Error);
        assert_eq!(record.error_category, Some(ErrorCategory::Network));
        assert_eq!(record.duration_ms, Some(0));
    }

    #[test]
    fn test_classified_failure_keeps_suggestions() {
        let now = Utc::now();
        let error = PrismError::api("Invalid API key")
            .with_suggestion("Check OPENAI_API_KEY");
        let mut record = QueryStatusRecord::pending("openai:gpt-4o");
        record.start(now).unwrap();
        record.fail_classified(now, &error).unwrap();
        assert_eq!(record.error_message.as_deref(), Some("Invalid API key"));
        assert_eq!(record.error_category, Some(ErrorCategory::Api));
        assert_eq!(record.error_suggestions, vec!["Check OPENAI_API_KEY"]);
    }

    #[test]
    fn test_cannot_skip_running() {
        let mut record = QueryStatusRecord::pending("openai:gpt-4o");
        let err = record.succeed(Utc::now()).unwrap_err();
        assert_eq!(err.from, QueryStatus::Pending);
        assert_eq!(err.to, QueryStatus::Success);
        assert_eq!(record.status, QueryStatus::Pending);
    }

    #[test]
    fn test_terminal_records_are_never_reopened() {
        let now = Utc::now();
        let mut record = QueryStatusRecord::pending("openai:gpt-4o");
        record.start(now).unwrap();
        record.succeed(now).unwrap();
        assert!(record.start(now).is_err());
        assert!(record.fail(now, "late", ErrorCategory::Unknown).is_err());
        assert_eq!(record.status, QueryStatus::Success);
    }
}
