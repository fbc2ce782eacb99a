//! Application layer for llm-prism
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    api_keys::{ApiKeyResolver, StaticApiKeys},
    context_loader::{ContextLoadError, ContextLoaderPort},
    file_system::FileSystemPort,
    llm_gateway::{
        GatewayError, GenerateRequest, Generation, ModelCatalog, ModelListing, ProviderClient,
        ProviderRegistry,
    },
    progress::{NoProgress, QueryProgressNotifier, WriteProgressNotifier},
};
pub use use_cases::run_query::{RunQueryInput, RunQueryUseCase};
pub use use_cases::select_models::{ModelSelection, SelectModelsUseCase, SelectionOutcome};
pub use use_cases::write_output::{WriteOutputError, WriteOutputInput, WriteOutputUseCase};
