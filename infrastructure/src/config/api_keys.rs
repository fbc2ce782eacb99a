//! Environment-backed API key resolution

use super::file_config::FileConfig;
use prism_application::ApiKeyResolver;
use prism_domain::ModelTarget;
use std::collections::HashMap;

/// Resolves API keys from a snapshot of environment variables.
///
/// Lookup order for a target: the model's `api_key_env`, then the
/// provider's `api_key_env`, then `{PROVIDER}_API_KEY`. Empty values count
/// as missing.
#[derive(Debug, Clone, Default)]
pub struct EnvApiKeyResolver {
    vars: HashMap<String, String>,
    model_vars: HashMap<String, String>,
    provider_vars: HashMap<String, String>,
}

impl EnvApiKeyResolver {
    /// Snapshot the process environment
    pub fn from_env(config: &FileConfig) -> Self {
        Self::with_vars(config, std::env::vars())
    }

    pub fn with_vars(config: &FileConfig, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let model_vars = config
            .models
            .iter()
            .filter_map(|m| {
                let var = m.api_key_env.clone()?;
                Some((m.to_configured().config_key(), var))
            })
            .collect();
        let provider_vars = config
            .providers
            .iter()
            .filter_map(|(name, p)| Some((name.clone(), p.api_key_env.clone()?)))
            .collect();

        Self {
            vars: vars.into_iter().collect(),
            model_vars,
            provider_vars,
        }
    }

    /// Conventional variable name for a provider: `openai` -> `OPENAI_API_KEY`
    pub fn default_var(provider: &str) -> String {
        let stem: String = provider
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_API_KEY", stem)
    }

    /// Candidate variable names for a target, highest priority first
    pub fn candidates(&self, target: &ModelTarget) -> Vec<String> {
        let mut names = Vec::with_capacity(3);
        if let Some(var) = self.model_vars.get(&target.config_key()) {
            names.push(var.clone());
        }
        if let Some(var) = self.provider_vars.get(&target.provider) {
            names.push(var.clone());
        }
        names.push(Self::default_var(&target.provider));
        names
    }

    /// Key for a provider as a whole (no model override), for `--list-models`
    pub fn provider_key(&self, provider: &str) -> Option<String> {
        self.provider_vars
            .get(provider)
            .cloned()
            .into_iter()
            .chain(std::iter::once(Self::default_var(provider)))
            .find_map(|var| self.lookup(&var))
    }

    fn lookup(&self, var: &str) -> Option<String> {
        self.vars
            .get(var)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

impl ApiKeyResolver for EnvApiKeyResolver {
    fn api_key(&self, target: &ModelTarget) -> Option<String> {
        self.candidates(target)
            .iter()
            .find_map(|var| self.lookup(var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FileConfig {
        toml::from_str(
            r#"
[providers.openai]
api_key_env = "WORK_OPENAI_KEY"

[[models]]
provider = "openai"
model_id = "gpt-4o"
api_key_env = "GPT4O_KEY"

[[models]]
provider = "openai"
model_id = "gpt-4o-mini"
"#,
        )
        .unwrap()
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_var_name() {
        assert_eq!(EnvApiKeyResolver::default_var("openai"), "OPENAI_API_KEY");
        assert_eq!(
            EnvApiKeyResolver::default_var("open-router"),
            "OPEN_ROUTER_API_KEY"
        );
    }

    #[test]
    fn test_model_override_wins() {
        let resolver = EnvApiKeyResolver::with_vars(
            &config(),
            vars(&[
                ("GPT4O_KEY", "model-key"),
                ("WORK_OPENAI_KEY", "provider-key"),
                ("OPENAI_API_KEY", "default-key"),
            ]),
        );
        assert_eq!(
            resolver.api_key(&ModelTarget::new("openai", "gpt-4o")).as_deref(),
            Some("model-key")
        );
        assert_eq!(
            resolver
                .api_key(&ModelTarget::new("openai", "gpt-4o-mini"))
                .as_deref(),
            Some("provider-key")
        );
    }

    #[test]
    fn test_falls_through_empty_values() {
        let resolver = EnvApiKeyResolver::with_vars(
            &config(),
            vars(&[
                ("GPT4O_KEY", "  "),
                ("WORK_OPENAI_KEY", ""),
                ("OPENAI_API_KEY", "default-key"),
            ]),
        );
        assert_eq!(
            resolver.api_key(&ModelTarget::new("openai", "gpt-4o")).as_deref(),
            Some("default-key")
        );
    }

    #[test]
    fn test_missing_key() {
        let resolver = EnvApiKeyResolver::with_vars(&config(), Vec::new());
        assert!(resolver.api_key(&ModelTarget::new("mistral", "large")).is_none());
        assert!(resolver.provider_key("openai").is_none());
    }

    #[test]
    fn test_provider_key_ignores_model_override() {
        let resolver = EnvApiKeyResolver::with_vars(
            &config(),
            vars(&[("GPT4O_KEY", "model-key"), ("OPENAI_API_KEY", "default-key")]),
        );
        assert_eq!(resolver.provider_key("openai").as_deref(), Some("default-key"));
    }
}
