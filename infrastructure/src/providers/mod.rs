//! Provider client adapters
//!
//! - [`OpenAiCompatibleClient`] - `chat/completions` servers, with a model catalogue
//! - [`AnthropicClient`] - the Anthropic Messages API
//!
//! [`build_registry`] turns the `[providers]` configuration into a
//! [`ProviderRegistry`] keyed by provider name.

mod anthropic;
mod http;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiCompatibleClient;

use crate::config::{FileConfig, ProviderKind};
use prism_application::{GatewayError, ProviderClient, ProviderRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build one client for provider `name` from its configuration
pub fn build_client(config: &FileConfig, name: &str) -> Result<Arc<dyn ProviderClient>, GatewayError> {
    let settings = config.provider(name);
    let kind = settings.resolve_kind(name).map_err(|kind| {
        GatewayError::Other(format!(
            "Provider '{}' has unknown kind '{}' (expected \"openai\" or \"anthropic\")",
            name, kind
        ))
    })?;
    let base_url = settings.base_url_or(kind);
    debug!("Registering provider {} ({:?}) at {}", name, kind, base_url);

    let client: Arc<dyn ProviderClient> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiCompatibleClient::new(
            name,
            base_url,
            settings.max_tokens,
            CONNECT_TIMEOUT,
        )?),
        ProviderKind::Anthropic => Arc::new(AnthropicClient::new(
            name,
            base_url,
            settings.max_tokens,
            CONNECT_TIMEOUT,
        )?),
    };
    Ok(client)
}

/// Register a client for every provider the configuration mentions.
///
/// A provider that cannot be built is left out; targets using it then
/// fail individually with a classified configuration error.
pub fn build_registry(config: &FileConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for name in config.provider_names() {
        match build_client(config, &name) {
            Ok(client) => registry.register(client),
            Err(e) => warn!("Skipping provider {}: {}", name, e),
        }
    }
    registry
}
