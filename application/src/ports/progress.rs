//! Progress notification ports
//!
//! Status changes are pushed to an observer instead of being read from
//! shared state. Implementations live in the presentation layer and never
//! influence control flow.

use prism_domain::{FileOutputResult, FileWriteDetail, QueryStatusRecord, RunResult};
use std::path::Path;

/// Callbacks for the query phase
pub trait QueryProgressNotifier: Send + Sync {
    /// Called once before dispatch with the number of targets
    fn on_run_start(&self, _total: usize) {}

    /// Called on every status transition of a target
    fn on_query_status(&self, record: &QueryStatusRecord);

    /// Called once all targets reached a terminal status
    fn on_run_complete(&self, _result: &RunResult) {}
}

/// Callbacks for the write phase
pub trait WriteProgressNotifier: Send + Sync {
    /// Called once the output directory is known
    fn on_write_start(&self, _directory: &Path, _total: usize) {}

    /// Called with `pending` before a write and again with its outcome
    fn on_file_status(&self, detail: &FileWriteDetail);

    /// Called once every artifact has been processed
    fn on_write_complete(&self, _result: &FileOutputResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl QueryProgressNotifier for NoProgress {
    fn on_query_status(&self, _record: &QueryStatusRecord) {}
}

impl WriteProgressNotifier for NoProgress {
    fn on_file_status(&self, _detail: &FileWriteDetail) {}
}
