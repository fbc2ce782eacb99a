//! Local filesystem adapter
//!
//! Implements [`FileSystemPort`](prism_application::FileSystemPort) with
//! `tokio::fs` so writes suspend instead of blocking the runtime.

mod local;

pub use local::LocalFileSystem;
