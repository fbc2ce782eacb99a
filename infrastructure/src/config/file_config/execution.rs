//! Execution configuration from TOML (`[execution]` section)

use prism_application::ExecutionParams;
use prism_domain::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw execution configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Maximum in-flight provider calls (unset = unbounded)
    pub max_concurrency: Option<usize>,
    /// Per-call timeout in seconds (unset = no client-side timeout)
    pub timeout_seconds: Option<u64>,
}

impl FileExecutionConfig {
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_concurrency(self.max_concurrency)
            .with_call_timeout(self.timeout_seconds.map(Duration::from_secs))
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_concurrency == Some(0) {
            issues.push(ConfigIssue::new(
                Severity::Warning,
                ConfigIssueCode::InvalidConcurrency,
                "execution.max_concurrency: 0 is not a limit, treating it as unbounded",
            ));
        }
        if self.timeout_seconds == Some(0) {
            issues.push(ConfigIssue::new(
                Severity::Warning,
                ConfigIssueCode::InvalidTimeout,
                "execution.timeout_seconds: 0 disables the timeout",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params() {
        let config = FileExecutionConfig {
            max_concurrency: Some(4),
            timeout_seconds: Some(90),
        };
        let params = config.to_params();
        assert_eq!(params.max_concurrency, Some(4));
        assert_eq!(params.call_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_zero_values_are_flagged_and_ignored() {
        let config = FileExecutionConfig {
            max_concurrency: Some(0),
            timeout_seconds: Some(0),
        };
        assert_eq!(config.validate().len(), 2);
        let params = config.to_params();
        assert!(params.max_concurrency.is_none());
        assert!(params.call_timeout.is_none());
    }
}
