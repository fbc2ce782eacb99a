//! File system port
//!
//! The only two filesystem operations the write phase needs. Adapters
//! return raw `std::io::Error`s so the classifier can inspect OS codes.

use async_trait::async_trait;
use std::io;
use std::path::Path;

#[async_trait]
pub trait FileSystemPort: Send + Sync {
    /// Create `path` and any missing parents
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path` and write `content` to it
    async fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;
}
