//! Aggregate result of one run

use super::response::LlmResponse;
use super::status::{QueryStatus, QueryStatusRecord};
use crate::core::timing::Timing;
use serde::{Deserialize, Serialize};

/// Responses, status ledger and overall timing for one run.
///
/// `responses` and `statuses` are index-aligned in target selection order,
/// and every config key present in one is present in the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub responses: Vec<LlmResponse>,
    pub statuses: Vec<QueryStatusRecord>,
    pub timing: Timing,
}

impl RunResult {
    pub fn status(&self, config_key: &str) -> Option<&QueryStatusRecord> {
        self.statuses.iter().find(|s| s.config_key == config_key)
    }

    pub fn response(&self, config_key: &str) -> Option<&LlmResponse> {
        self.responses.iter().find(|r| r.config_key == config_key)
    }

    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    pub fn success_count(&self) -> usize {
        self.count(QueryStatus::Success)
    }

    pub fn failure_count(&self) -> usize {
        self.count(QueryStatus::Error)
    }

    pub fn failed(&self) -> impl Iterator<Item = &QueryStatusRecord> {
        self.statuses
            .iter()
            .filter(|s| s.status == QueryStatus::Error)
    }

    fn count(&self, status: QueryStatus) -> usize {
        self.statuses.iter().filter(|s| s.status == status).count()
    }
}
