//! Local file system context loader
//!
//! Reads the files passed with `--context` so their contents can be
//! appended to the prompt.

use async_trait::async_trait;
use prism_application::{ContextLoadError, ContextLoaderPort};
use prism_domain::ContextFile;
use std::path::PathBuf;
use tracing::debug;

/// Context loader that reads from the local file system.
#[derive(Debug, Clone, Default)]
pub struct LocalContextLoader;

impl LocalContextLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContextLoaderPort for LocalContextLoader {
    async fn load(&self, paths: &[PathBuf]) -> Result<Vec<ContextFile>, ContextLoadError> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ContextLoadError {
                    path: path.clone(),
                    source,
                })?;
            debug!("Loaded context file {} ({} bytes)", path.display(), content.len());
            files.push(ContextFile::new(path.clone(), content));
        }
        Ok(files)
    }
}
