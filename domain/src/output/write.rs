//! File write ledger
//!
//! One [`FileWriteDetail`] per artifact, mirroring the query status record
//! lifecycle for the write phase.

use crate::core::timing::{Timing, elapsed_ms};
use crate::error::{ErrorCategory, PrismError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Write status of one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Pending,
    Success,
    Error,
}

impl WriteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteStatus::Pending => "pending",
            WriteStatus::Success => "success",
            WriteStatus::Error => "error",
        }
    }
}

/// Ledger entry for one artifact write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileWriteDetail {
    pub model_key: String,
    pub filename: String,
    pub file_path: PathBuf,
    pub status: WriteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    /// Remediation hints from the classifier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_suggestions: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
}

impl FileWriteDetail {
    pub fn pending(
        model_key: impl Into<String>,
        filename: impl Into<String>,
        file_path: impl Into<PathBuf>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            model_key: model_key.into(),
            filename: filename.into(),
            file_path: file_path.into(),
            status: WriteStatus::Pending,
            error: None,
            error_category: None,
            error_suggestions: Vec::new(),
            start_time: at,
            end_time: None,
            duration_ms: None,
        }
    }

    /// Stamp the moment the write itself began
    pub fn begin(&mut self, at: DateTime<Utc>) {
        self.start_time = at;
    }

    pub fn succeed(&mut self, at: DateTime<Utc>) {
        self.status = WriteStatus::Success;
        self.finish(at);
    }

    pub fn fail(
        &mut self,
        at: DateTime<Utc>,
        message: impl Into<String>,
        category: ErrorCategory,
    ) {
        self.status = WriteStatus::Error;
        self.error = Some(message.into());
        self.error_category = Some(category);
        self.finish(at);
    }

    pub fn fail_classified(&mut self, at: DateTime<Utc>, error: &PrismError) {
        self.fail(at, error.message(), error.category());
        self.error_suggestions = error.suggestions().to_vec();
    }

    fn finish(&mut self, at: DateTime<Utc>) {
        self.end_time = Some(at);
        self.duration_ms = Some(elapsed_ms(self.start_time, at));
    }
}

/// Outcome of writing a run's artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutputResult {
    pub output_directory: PathBuf,
    pub files: Vec<FileWriteDetail>,
    pub succeeded_writes: usize,
    pub failed_writes: usize,
    pub timing: Timing,
}

impl FileOutputResult {
    pub fn failed(&self) -> impl Iterator<Item = &FileWriteDetail> {
        self.files.iter().filter(|f| f.status == WriteStatus::Error)
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_writes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_detail_lifecycle() {
        let now = Utc::now();
        let mut detail = FileWriteDetail::pending(
            "openai:gpt-4o",
            "openai-gpt-4o.md",
            "/tmp/x/openai-gpt-4o.md",
            now,
        );
        assert_eq!(detail.status, WriteStatus::Pending);
        detail.fail(
            now + Duration::milliseconds(7),
            "No space left on device",
            ErrorCategory::FileSystem,
        );
        assert_eq!(detail.status, WriteStatus::Error);
        assert_eq!(detail.duration_ms, Some(7));
        assert_eq!(detail.error.as_deref(), Some("No space left on device"));
    }

    #[test]
    fn test_begin_restarts_the_clock() {
        let queued = Utc::now();
        let mut detail = FileWriteDetail::pending("a:b", "a-b.md", "/tmp/x/a-b.md", queued);
        let began = queued + Duration::milliseconds(40);
        detail.begin(began);
        detail.succeed(began + Duration::milliseconds(5));
        assert_eq!(detail.start_time, began);
        assert_eq!(detail.duration_ms, Some(5));
    }
}
