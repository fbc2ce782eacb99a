//! Configuration file loading for llm-prism
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PRISM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./prism.toml` or `./.prism.toml`
//! 4. Global: `$XDG_CONFIG_HOME/llm-prism/config.toml`
//! 5. Default values

mod api_keys;
mod file_config;
mod loader;

pub use api_keys::EnvApiKeyResolver;
pub use file_config::{
    FileConfig, FileExecutionConfig, FileGroupConfig, FileModelEntry, FileOutputConfig,
    FileProviderConfig, ProviderKind,
};
pub use loader::ConfigLoader;
