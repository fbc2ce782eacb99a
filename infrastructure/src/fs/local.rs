use async_trait::async_trait;
use prism_application::FileSystemPort;
use std::io;
use std::path::Path;
use tracing::trace;

/// Filesystem port backed by the local disk
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystemPort for LocalFileSystem {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        trace!("mkdir -p {}", path.display());
        tokio::fs::create_dir_all(path).await
    }

    async fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        trace!("write {} ({} bytes)", path.display(), content.len());
        tokio::fs::write(path, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_application::{WriteOutputInput, WriteOutputUseCase};
    use prism_domain::{FileArtifact, WriteStatus};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_write() {
        let dir = TempDir::new().unwrap();
        let run_dir = dir.path().join("out").join("run-20240101-120000");
        let fs = LocalFileSystem::new();

        fs.create_dir_all(&run_dir).await.unwrap();
        fs.write_file(&run_dir.join("a.md"), "# a").await.unwrap();

        assert_eq!(std::fs::read_to_string(run_dir.join("a.md")).unwrap(), "# a");
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = LocalFileSystem::new()
            .write_file(&dir.path().join("missing").join("a.md"), "x")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_directory_over_existing_file_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "").unwrap();

        let result = LocalFileSystem::new()
            .create_dir_all(&blocker.join("run"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_write_phase_lands_every_artifact_on_disk() {
        let dir = TempDir::new().unwrap();
        let run_dir = dir.path().join("run-20240101-120000");
        let artifacts: Vec<FileArtifact> = ["openai:gpt-4o", "anthropic:claude", "groq:llama"]
            .iter()
            .map(|key| {
                FileArtifact::new(
                    format!("{}.md", key.replace(':', "-")),
                    format!("# {}\n\nbody for {} with ünïcode\n", key, key),
                    *key,
                )
            })
            .collect();
        let use_case = WriteOutputUseCase::new(Arc::new(LocalFileSystem::new()));

        let result = use_case
            .execute(WriteOutputInput::new(artifacts.clone(), &run_dir))
            .await
            .unwrap();

        assert_eq!(result.succeeded_writes, artifacts.len());
        assert!(result.files.iter().all(|f| f.status == WriteStatus::Success));
        assert_eq!(std::fs::read_dir(&run_dir).unwrap().count(), artifacts.len());
        for artifact in &artifacts {
            let written = std::fs::read(run_dir.join(&artifact.filename)).unwrap();
            assert_eq!(written, artifact.content.as_bytes());
        }
    }
}
