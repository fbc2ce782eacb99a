//! Context file loading port

use async_trait::async_trait;
use prism_domain::{ClassifyContext, ContextFile, Failure, PrismError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A context file that could not be read
#[derive(Debug, Error)]
#[error("Failed to read context file {}: {source}", .path.display())]
pub struct ContextLoadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ContextLoadError {
    pub fn classify(self, context: &ClassifyContext) -> PrismError {
        prism_domain::classify(Failure::io_at(self.source, &self.path), context)
    }
}

/// Loads the files named with `--context` so they can be appended to the prompt.
#[async_trait]
pub trait ContextLoaderPort: Send + Sync {
    /// Load every path in order; the first unreadable file aborts loading
    async fn load(&self, paths: &[PathBuf]) -> Result<Vec<ContextFile>, ContextLoadError>;
}
