//! API key resolution port

use prism_domain::ModelTarget;

/// Resolves the API key used to call a target's provider.
///
/// Returns `None` (never an empty string) when no usable key exists.
pub trait ApiKeyResolver: Send + Sync {
    fn api_key(&self, target: &ModelTarget) -> Option<String>;
}

/// Resolver backed by a fixed `provider -> key` map, useful for tests and
/// for providers that need no authentication.
#[derive(Debug, Clone, Default)]
pub struct StaticApiKeys {
    keys: std::collections::HashMap<String, String>,
}

impl StaticApiKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys.insert(provider.into(), key.into());
        self
    }
}

impl ApiKeyResolver for StaticApiKeys {
    fn api_key(&self, target: &ModelTarget) -> Option<String> {
        self.keys
            .get(&target.provider)
            .filter(|k| !k.trim().is_empty())
            .cloned()
    }
}
