//! Write Output use case
//!
//! Persists a run's artifacts under one directory, keeping a ledger entry
//! per file whatever happens to its siblings.

use crate::ports::file_system::FileSystemPort;
use crate::ports::progress::{NoProgress, WriteProgressNotifier};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use prism_domain::{
    ClassifyContext, FileArtifact, FileOutputResult, FileWriteDetail, Failure, PrismError, Timing,
    WriteStatus, classify,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the write phase when `throw_on_error` is set
#[derive(Error, Debug)]
pub enum WriteOutputError {
    #[error("Could not create output directory {}: {source}", .directory.display())]
    DirectoryCreation {
        directory: PathBuf,
        #[source]
        source: PrismError,
    },

    /// Raised after every write was attempted; `result` is the full ledger.
    #[error("Failed to write {} of {} file(s): {source}", .result.failed_writes, .result.files.len())]
    FileWrite {
        result: Box<FileOutputResult>,
        #[source]
        source: PrismError,
    },
}

impl WriteOutputError {
    /// The classified error that caused the failure
    pub fn error(&self) -> &PrismError {
        match self {
            WriteOutputError::DirectoryCreation { source, .. }
            | WriteOutputError::FileWrite { source, .. } => source,
        }
    }

    /// The ledger as it stood when the error was raised, if any write ran
    pub fn partial_result(&self) -> Option<&FileOutputResult> {
        match self {
            WriteOutputError::DirectoryCreation { .. } => None,
            WriteOutputError::FileWrite { result, .. } => Some(result.as_ref()),
        }
    }
}

/// Input for the WriteOutput use case
#[derive(Debug, Clone)]
pub struct WriteOutputInput {
    pub artifacts: Vec<FileArtifact>,
    pub directory: PathBuf,
    /// Raise instead of degrading when the directory or a file fails
    pub throw_on_error: bool,
    pub classify_context: ClassifyContext,
}

impl WriteOutputInput {
    pub fn new(artifacts: Vec<FileArtifact>, directory: impl Into<PathBuf>) -> Self {
        Self {
            artifacts,
            directory: directory.into(),
            throw_on_error: false,
            classify_context: ClassifyContext::default(),
        }
    }

    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }

    pub fn with_classify_context(mut self, context: ClassifyContext) -> Self {
        self.classify_context = context;
        self
    }
}

/// Use case for writing artifacts to disk
pub struct WriteOutputUseCase {
    fs: Arc<dyn FileSystemPort>,
}

impl WriteOutputUseCase {
    pub fn new(fs: Arc<dyn FileSystemPort>) -> Self {
        Self { fs }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: WriteOutputInput,
    ) -> Result<FileOutputResult, WriteOutputError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case, reporting each file as `pending` and again on
    /// completion.
    pub async fn execute_with_progress(
        &self,
        input: WriteOutputInput,
        progress: &dyn WriteProgressNotifier,
    ) -> Result<FileOutputResult, WriteOutputError> {
        let started = Utc::now();
        let directory = input.directory.as_path();
        progress.on_write_start(directory, input.artifacts.len());

        let mut files: Vec<FileWriteDetail> = input
            .artifacts
            .iter()
            .map(|a| {
                FileWriteDetail::pending(
                    &a.model_key,
                    &a.filename,
                    directory.join(&a.filename),
                    started,
                )
            })
            .collect();

        if let Err(e) = self.fs.create_dir_all(directory).await {
            let error = classify(Failure::io_at(e, directory), &input.classify_context);
            warn!(
                "Could not create output directory {}: {}",
                directory.display(),
                error
            );
            if input.throw_on_error {
                return Err(WriteOutputError::DirectoryCreation {
                    directory: directory.to_path_buf(),
                    source: error,
                });
            }

            let now = Utc::now();
            for detail in &mut files {
                progress.on_file_status(detail);
                detail.fail_classified(now, &error);
                progress.on_file_status(detail);
            }
            let result = Self::summarize(directory, files, Timing::between(started, now));
            progress.on_write_complete(&result);
            return Ok(result);
        }
        debug!("Output directory ready: {}", directory.display());

        for detail in &files {
            progress.on_file_status(detail);
        }

        let mut writes: FuturesUnordered<_> = input
            .artifacts
            .iter()
            .zip(&files)
            .enumerate()
            .map(|(index, (artifact, detail))| {
                let path = detail.file_path.clone();
                async move {
                    let began = Utc::now();
                    let outcome = self.write_one(directory, &path, &artifact.content).await;
                    (index, path, began, outcome)
                }
            })
            .collect();

        let mut first_error: Option<PrismError> = None;
        while let Some((index, path, began, outcome)) = writes.next().await {
            let detail = &mut files[index];
            detail.begin(began);
            let now = Utc::now();
            match outcome {
                Ok(()) => {
                    debug!("Wrote {}", path.display());
                    detail.succeed(now);
                }
                Err(e) => {
                    let error = classify(Failure::io_at(e, &path), &input.classify_context);
                    warn!("Failed to write {}: {}", path.display(), error);
                    detail.fail_classified(now, &error);
                    first_error.get_or_insert(error);
                }
            }
            progress.on_file_status(detail);
        }

        let result = Self::summarize(directory, files, Timing::between(started, Utc::now()));
        info!(
            "Wrote {}/{} file(s) to {}",
            result.succeeded_writes,
            result.files.len(),
            directory.display()
        );
        progress.on_write_complete(&result);

        match first_error {
            Some(source) if input.throw_on_error => Err(WriteOutputError::FileWrite {
                result: Box::new(result),
                source,
            }),
            _ => Ok(result),
        }
    }

    /// Write one file, creating any parent directory implied by its name.
    async fn write_one(&self, directory: &Path, path: &Path, content: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && parent != directory
        {
            self.fs.create_dir_all(parent).await?;
        }
        self.fs.write_file(path, content).await
    }

    fn summarize(directory: &Path, files: Vec<FileWriteDetail>, timing: Timing) -> FileOutputResult {
        let succeeded_writes = files
            .iter()
            .filter(|f| f.status == WriteStatus::Success)
            .count();
        let failed_writes = files
            .iter()
            .filter(|f| f.status == WriteStatus::Error)
            .count();
        FileOutputResult {
            output_directory: directory.to_path_buf(),
            files,
            succeeded_writes,
            failed_writes,
            timing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_domain::ErrorCategory;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::sync::Mutex;

    // === Mock implementations ===

    #[derive(Default)]
    struct MemoryFs {
        dirs: Mutex<HashSet<PathBuf>>,
        files: Mutex<HashMap<PathBuf, String>>,
        fail_dirs: bool,
        denied: HashSet<PathBuf>,
    }

    impl MemoryFs {
        fn deny(mut self, path: impl Into<PathBuf>) -> Self {
            self.denied.insert(path.into());
            self
        }

        fn without_dirs(mut self) -> Self {
            self.fail_dirs = true;
            self
        }
    }

    #[async_trait]
    impl FileSystemPort for MemoryFs {
        async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            if self.fail_dirs {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            self.dirs.lock().unwrap().insert(path.to_path_buf());
            Ok(())
        }

        async fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
            if self.denied.contains(path) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<(String, WriteStatus)>>,
    }

    impl WriteProgressNotifier for RecordingProgress {
        fn on_file_status(&self, detail: &FileWriteDetail) {
            self.events
                .lock()
                .unwrap()
                .push((detail.filename.clone(), detail.status));
        }
    }

    fn artifacts() -> Vec<FileArtifact> {
        vec![
            FileArtifact::new("openai-gpt-4o.md", "# openai:gpt-4o", "openai:gpt-4o"),
            FileArtifact::new(
                "anthropic-claude.md",
                "# anthropic:claude",
                "anthropic:claude",
            ),
        ]
    }

    fn dir() -> PathBuf {
        PathBuf::from("out/run-20240101-120000")
    }

    #[tokio::test]
    async fn test_writes_every_artifact() {
        let fs = Arc::new(MemoryFs::default());
        let progress = RecordingProgress::default();
        let use_case = WriteOutputUseCase::new(fs.clone());

        let result = use_case
            .execute_with_progress(WriteOutputInput::new(artifacts(), dir()), &progress)
            .await
            .unwrap();

        assert_eq!(result.succeeded_writes, 2);
        assert_eq!(result.failed_writes, 0);
        assert!(result.all_succeeded());
        assert_eq!(result.output_directory, dir());
        assert!(fs.dirs.lock().unwrap().contains(&dir()));
        assert_eq!(
            fs.files.lock().unwrap()[&dir().join("openai-gpt-4o.md")],
            "# openai:gpt-4o"
        );

        let events = progress.events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ("openai-gpt-4o.md".to_string(), WriteStatus::Pending));
        assert_eq!(events[1], ("anthropic-claude.md".to_string(), WriteStatus::Pending));
        assert!(events[2..].iter().all(|(_, s)| *s == WriteStatus::Success));
    }

    #[tokio::test]
    async fn test_one_failed_write_is_tracked() {
        let fs = MemoryFs::default().deny(dir().join("anthropic-claude.md"));
        let use_case = WriteOutputUseCase::new(Arc::new(fs));

        let result = use_case
            .execute(WriteOutputInput::new(artifacts(), dir()))
            .await
            .unwrap();

        assert_eq!(result.succeeded_writes, 1);
        assert_eq!(result.failed_writes, 1);
        let failed: Vec<_> = result.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].model_key, "anthropic:claude");
        assert_eq!(failed[0].error_category, Some(ErrorCategory::Permission));
        assert!(failed[0].end_time.is_some());
        assert_eq!(result.files[0].status, WriteStatus::Success);
    }

    #[tokio::test]
    async fn test_each_file_stamps_its_own_start() {
        let fs = MemoryFs::default().deny(dir().join("anthropic-claude.md"));
        let use_case = WriteOutputUseCase::new(Arc::new(fs));
        let before = Utc::now();

        let result = use_case
            .execute(WriteOutputInput::new(artifacts(), dir()))
            .await
            .unwrap();

        for file in &result.files {
            assert!(file.start_time >= result.timing.started_at);
            assert!(file.start_time >= before);
            assert!(file.end_time.unwrap() >= file.start_time);
        }
        let failed: Vec<_> = result.failed().collect();
        assert!(!failed[0].error_suggestions.is_empty());
        assert!(result.files[0].error_suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_throw_on_error_keeps_full_ledger() {
        let fs = MemoryFs::default().deny(dir().join("openai-gpt-4o.md"));
        let use_case = WriteOutputUseCase::new(Arc::new(fs));

        let err = use_case
            .execute(WriteOutputInput::new(artifacts(), dir()).throw_on_error(true))
            .await
            .unwrap_err();

        assert_eq!(err.error().category(), ErrorCategory::Permission);
        let ledger = err.partial_result().unwrap();
        assert_eq!(ledger.files.len(), 2);
        assert_eq!(ledger.files[0].status, WriteStatus::Error);
        assert_eq!(ledger.files[1].status, WriteStatus::Success);
        assert_eq!(ledger.succeeded_writes + ledger.failed_writes, 2);
    }

    #[tokio::test]
    async fn test_directory_failure_marks_all_failed() {
        let use_case = WriteOutputUseCase::new(Arc::new(MemoryFs::default().without_dirs()));
        let context = ClassifyContext::new().with_output_dir(dir());

        let result = use_case
            .execute(WriteOutputInput::new(artifacts(), dir()).with_classify_context(context))
            .await
            .unwrap();

        assert_eq!(result.succeeded_writes, 0);
        assert_eq!(result.failed_writes, 2);
        assert!(result
            .files
            .iter()
            .all(|f| f.error_category == Some(ErrorCategory::Permission)));
    }

    #[tokio::test]
    async fn test_directory_failure_raises_when_asked() {
        let use_case = WriteOutputUseCase::new(Arc::new(MemoryFs::default().without_dirs()));

        let err = use_case
            .execute(WriteOutputInput::new(artifacts(), dir()).throw_on_error(true))
            .await
            .unwrap_err();

        assert!(matches!(err, WriteOutputError::DirectoryCreation { .. }));
        assert!(err.partial_result().is_none());
        assert!(!err.error().suggestions().is_empty());
    }

    #[tokio::test]
    async fn test_nested_filename_creates_parent() {
        let fs = Arc::new(MemoryFs::default());
        let use_case = WriteOutputUseCase::new(fs.clone());
        let nested = vec![FileArtifact::new("coding/openai-gpt-4o.md", "x", "openai:gpt-4o")];

        let result = use_case
            .execute(WriteOutputInput::new(nested, dir()))
            .await
            .unwrap();

        assert_eq!(result.succeeded_writes, 1);
        assert!(fs.dirs.lock().unwrap().contains(&dir().join("coding")));
    }

    #[tokio::test]
    async fn test_no_artifacts() {
        let use_case = WriteOutputUseCase::new(Arc::new(MemoryFs::default()));
        let result = use_case
            .execute(WriteOutputInput::new(Vec::new(), dir()))
            .await
            .unwrap();
        assert!(result.files.is_empty());
        assert_eq!(result.succeeded_writes + result.failed_writes, 0);
    }
}
