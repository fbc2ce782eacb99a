//! LLM provider port
//!
//! Defines the interface for communicating with LLM providers, plus the
//! registry that maps provider names to clients.

use async_trait::async_trait;
use prism_domain::{ClassifyContext, Failure, PrismError, ResponseMetadata};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a provider call
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network connection failed: {0}")]
    Connection(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Authentication failed (invalid API key?): {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Model not found: {0}")]
    ModelNotAvailable(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("No API key configured for {0}")]
    MissingApiKey(String),

    #[error("No client registered for provider '{0}'")]
    ProviderNotRegistered(String),

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    /// Classify this error into the domain taxonomy.
    pub fn classify(self, context: &ClassifyContext) -> PrismError {
        prism_domain::classify(Failure::from(self), context)
    }
}

impl From<GatewayError> for Failure {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ProviderNotRegistered(ref provider) => {
                let message = err.to_string();
                Failure::Domain(
                    PrismError::config(message)
                        .with_suggestion(format!(
                            "Add a [providers.{}] section to prism.toml",
                            provider
                        ))
                        .with_suggestion("Supported provider kinds are \"openai\" and \"anthropic\""),
                )
            }
            GatewayError::Other(message) if message.trim().is_empty() => {
                Failure::Opaque(None)
            }
            other => Failure::error(other),
        }
    }
}

/// One generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model_id: String,
    pub system_prompt: Option<String>,
    pub api_key: String,
}

/// Text returned by a provider, with whatever metadata it reported
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub text: String,
    pub metadata: Option<ResponseMetadata>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A model offered by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelListing {
    pub id: String,
    pub description: Option<String>,
}

/// Client for one LLM provider
///
/// This port defines how the application layer talks to a provider.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Provider name as used in config keys (e.g. `openai`)
    fn name(&self) -> &str;

    /// Send the prompt and return the model's text
    async fn generate(&self, request: &GenerateRequest) -> Result<Generation, GatewayError>;

    /// Model listing capability, when the provider supports it
    fn catalog(&self) -> Option<&dyn ModelCatalog> {
        None
    }
}

/// Optional capability: list the models a provider offers
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelListing>, GatewayError>;
}

/// Provider name to client mapping
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    clients: HashMap<String, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under its own name, replacing any previous one
    pub fn register(&mut self, client: Arc<dyn ProviderClient>) {
        self.clients.insert(client.name().to_string(), client);
    }

    pub fn with(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.register(client);
        self
    }

    pub fn get(&self, provider: &str) -> Result<Arc<dyn ProviderClient>, GatewayError> {
        self.clients
            .get(provider)
            .cloned()
            .ok_or_else(|| GatewayError::ProviderNotRegistered(provider.to_string()))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.clients.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_domain::{ErrorCategory, ErrorKind};

    struct Echo;

    #[async_trait]
    impl ProviderClient for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<Generation, GatewayError> {
            Ok(Generation::text(request.prompt.clone()))
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ProviderRegistry::new().with(Arc::new(Echo));
        assert!(registry.get("echo").is_ok());
        assert!(matches!(
            registry.get("missing"),
            Err(GatewayError::ProviderNotRegistered(name)) if name == "missing"
        ));
        assert_eq!(registry.provider_names(), vec!["echo"]);
    }

    #[test]
    fn test_catalog_absent_by_default() {
        assert!(Echo.catalog().is_none());
    }

    #[test]
    fn test_gateway_errors_classify() {
        let ctx = ClassifyContext::new();
        assert_eq!(
            GatewayError::Timeout(Duration::from_secs(30))
                .classify(&ctx)
                .category(),
            ErrorCategory::Network
        );
        assert_eq!(
            GatewayError::Unauthorized("bad key".into())
                .classify(&ctx)
                .category(),
            ErrorCategory::Api
        );
        assert_eq!(
            GatewayError::MissingApiKey("openai:gpt-4o".into())
                .classify(&ctx)
                .category(),
            ErrorCategory::Api
        );
        assert_eq!(
            GatewayError::RateLimited("slow down".into())
                .classify(&ctx)
                .category(),
            ErrorCategory::Api
        );
        assert_eq!(
            GatewayError::ModelNotAvailable("gpt-9".into())
                .classify(&ctx)
                .category(),
            ErrorCategory::Config
        );
        assert_eq!(
            GatewayError::Connection("refused".into())
                .classify(&ctx)
                .category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_unregistered_provider_is_config_error() {
        let err = GatewayError::ProviderNotRegistered("mistral".into())
            .classify(&ClassifyContext::new());
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.suggestions().iter().any(|s| s.contains("[providers.mistral]")));
    }

    #[test]
    fn test_empty_other_is_opaque() {
        let err = GatewayError::Other(String::new()).classify(&ClassifyContext::new());
        assert_eq!(err.category(), ErrorCategory::Unknown);
        assert!(err.message().contains("no structured error information"));
    }
}
