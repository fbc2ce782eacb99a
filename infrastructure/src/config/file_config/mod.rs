//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types on demand.

mod execution;
mod models;
mod output;
mod providers;

pub use execution::FileExecutionConfig;
pub use models::{FileGroupConfig, FileModelEntry};
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, ProviderKind};

use prism_domain::{ConfigIssue, ConfigIssueCode, ModelsConfig, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Output settings
    pub output: FileOutputConfig,
    /// Dispatch settings
    pub execution: FileExecutionConfig,
    /// Provider endpoints, keyed by the provider name used in config keys
    pub providers: BTreeMap<String, FileProviderConfig>,
    /// Every model that can be selected
    pub models: Vec<FileModelEntry>,
    /// Named model groups
    pub groups: BTreeMap<String, FileGroupConfig>,
}

impl FileConfig {
    /// The model catalogue in domain form; groups are ordered by name.
    pub fn to_models_config(&self) -> ModelsConfig {
        ModelsConfig {
            models: self.models.iter().map(FileModelEntry::to_configured).collect(),
            groups: self
                .groups
                .iter()
                .map(|(name, group)| group.to_group(name))
                .collect(),
        }
    }

    /// Settings for provider `name`, falling back to an empty table for
    /// providers that are only referenced by models.
    pub fn provider(&self, name: &str) -> FileProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }

    /// Every provider name referenced by a table or a model, sorted
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .providers
            .keys()
            .cloned()
            .chain(self.models.iter().map(|m| m.provider.trim().to_string()))
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks the model catalogue (empty fields, duplicates, group members),
    /// execution limits and provider kinds.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_models_config().validate();
        issues.extend(self.execution.validate());

        for (name, provider) in &self.providers {
            if let Err(kind) = provider.resolve_kind(name) {
                issues.push(ConfigIssue::new(
                    Severity::Error,
                    ConfigIssueCode::UnknownProviderKind {
                        provider: name.clone(),
                        kind: kind.clone(),
                    },
                    format!(
                        "providers.{}.kind: unknown value '{}' (expected \"openai\" or \"anthropic\")",
                        name, kind
                    ),
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[output]
directory = "responses"
color = false

[execution]
max_concurrency = 3
timeout_seconds = 60

[providers.openai]
api_key_env = "MY_OPENAI_KEY"

[providers.local]
kind = "openai"
base_url = "http://localhost:11434/v1"

[[models]]
provider = "openai"
model_id = "gpt-4o"

[[models]]
provider = "anthropic"
model_id = "claude-3-5-sonnet-latest"
enabled = false

[[models]]
provider = "local"
model_id = "llama3.1:8b"
api_key_env = "LOCAL_KEY"

[groups.coding]
description = "Code review"
system_prompt = "You are a careful reviewer."
models = ["openai:gpt-4o", "local:llama3.1:8b"]
"#;

    #[test]
    fn test_deserialize_full_config() {
        let config: FileConfig = toml::from_str(FULL).unwrap();
        assert!(!config.output.color);
        assert_eq!(config.execution.max_concurrency, Some(3));
        assert_eq!(config.models.len(), 3);
        assert!(config.models[0].enabled);
        assert!(!config.models[1].enabled);
        assert_eq!(config.models[2].api_key_env.as_deref(), Some("LOCAL_KEY"));
        assert_eq!(
            config.providers["local"].base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_to_models_config() {
        let config: FileConfig = toml::from_str(FULL).unwrap();
        let models = config.to_models_config();

        assert!(models.find("local:llama3.1:8b").is_some());
        let group = models.group("coding").unwrap();
        assert_eq!(group.system_prompt.as_deref(), Some("You are a careful reviewer."));
        assert_eq!(group.models.len(), 2);
    }

    #[test]
    fn test_provider_names_include_model_only_providers() {
        let config: FileConfig = toml::from_str(FULL).unwrap();
        assert_eq!(config.provider_names(), vec!["anthropic", "local", "openai"]);
        assert_eq!(config.provider("anthropic"), FileProviderConfig::default());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[execution]\ntimeout_seconds = 5\n").unwrap();
        assert!(config.models.is_empty());
        assert!(config.output.include_metadata);
        assert_eq!(config.execution.timeout_seconds, Some(5));
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let toml_str = r#"
[providers.weird]
kind = "carrier-pigeon"

[[models]]
provider = ""
model_id = "x"

[[models]]
provider = "openai"
model_id = "gpt-4o"

[[models]]
provider = "openai"
model_id = "gpt-4o"

[groups.empty]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        let codes: Vec<_> = issues.iter().map(|i| &i.code).collect();

        assert!(codes.contains(&&ConfigIssueCode::EmptyProvider));
        assert!(codes.contains(&&ConfigIssueCode::DuplicateModel {
            key: "openai:gpt-4o".to_string()
        }));
        assert!(codes.contains(&&ConfigIssueCode::EmptyGroup {
            group: "empty".to_string()
        }));
        assert!(codes.contains(&&ConfigIssueCode::UnknownProviderKind {
            provider: "weird".to_string(),
            kind: "carrier-pigeon".to_string()
        }));
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }
}
