//! Execution parameters: query dispatch control.
//!
//! [`ExecutionParams`] groups the static parameters that control how the
//! query executor dispatches a run. These are application-layer concerns,
//! not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dispatch control parameters for [`RunQueryUseCase`](crate::use_cases::run_query::RunQueryUseCase).
///
/// Both limits are optional. Without them every target is in flight at
/// once and only the provider call itself bounds its duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of provider calls in flight at once.
    pub max_concurrency: Option<usize>,
    /// Client-side timeout applied to each provider call.
    pub call_timeout: Option<Duration>,
}

impl ExecutionParams {
    pub fn with_max_concurrency(mut self, max: Option<usize>) -> Self {
        self.max_concurrency = max.filter(|m| *m > 0);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout.filter(|t| !t.is_zero());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let params = ExecutionParams::default();
        assert!(params.max_concurrency.is_none());
        assert!(params.call_timeout.is_none());
    }

    #[test]
    fn test_zero_limits_mean_unbounded() {
        let params = ExecutionParams::default()
            .with_max_concurrency(Some(0))
            .with_call_timeout(Some(Duration::ZERO));
        assert!(params.max_concurrency.is_none());
        assert!(params.call_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_concurrency(Some(2))
            .with_call_timeout(Some(Duration::from_secs(30)));
        assert_eq!(params.max_concurrency, Some(2));
        assert_eq!(params.call_timeout, Some(Duration::from_secs(30)));
    }
}
