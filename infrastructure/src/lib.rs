//! Infrastructure layer for llm-prism
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, API key lookup,
//! the local filesystem, context files and HTTP provider clients.

pub mod config;
pub mod context;
pub mod fs;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, EnvApiKeyResolver, FileConfig, FileExecutionConfig, FileOutputConfig,
    FileProviderConfig, ProviderKind,
};
pub use context::LocalContextLoader;
pub use fs::LocalFileSystem;
pub use providers::{AnthropicClient, OpenAiCompatibleClient, build_client, build_registry};
