//! Configured models and groups

use super::validation::{ConfigIssue, ConfigIssueCode, Severity};
use crate::core::target::{GroupInfo, ModelTarget, config_key};
use std::collections::HashSet;

/// A model entry from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredModel {
    pub provider: String,
    pub model_id: String,
    pub enabled: bool,
    /// Per-model override of the API key environment variable
    pub api_key_env: Option<String>,
}

impl ConfiguredModel {
    pub fn new(provider: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model_id: model_id.into(),
            enabled: true,
            api_key_env: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn config_key(&self) -> String {
        config_key(&self.provider, &self.model_id)
    }

    pub fn to_target(&self, group: Option<GroupInfo>) -> ModelTarget {
        ModelTarget {
            provider: self.provider.clone(),
            model_id: self.model_id.clone(),
            enabled: self.enabled,
            group,
        }
    }
}

/// A named set of models sharing an optional system prompt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelGroup {
    pub name: String,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    /// Member config keys (`provider:model_id`)
    pub models: Vec<String>,
}

impl ModelGroup {
    pub fn group_info(&self) -> GroupInfo {
        GroupInfo {
            name: self.name.clone(),
            system_prompt: self.system_prompt.clone(),
        }
    }
}

/// The full model catalogue: every configured model plus named groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelsConfig {
    pub models: Vec<ConfiguredModel>,
    pub groups: Vec<ModelGroup>,
}

impl ModelsConfig {
    pub fn find(&self, key: &str) -> Option<&ConfiguredModel> {
        self.models.iter().find(|m| m.config_key() == key)
    }

    pub fn group(&self, name: &str) -> Option<&ModelGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn config_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.models.iter().map(ConfiguredModel::config_key)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Check the catalogue for structural problems.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for model in &self.models {
            if model.provider.trim().is_empty() {
                issues.push(ConfigIssue::new(
                    Severity::Error,
                    ConfigIssueCode::EmptyProvider,
                    format!("models: entry '{}' has an empty provider", model.config_key()),
                ));
            }
            if model.model_id.trim().is_empty() {
                issues.push(ConfigIssue::new(
                    Severity::Error,
                    ConfigIssueCode::EmptyModelId,
                    format!("models: entry '{}' has an empty model_id", model.config_key()),
                ));
            }
            let key = model.config_key();
            if !seen.insert(key.clone()) {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    ConfigIssueCode::DuplicateModel { key: key.clone() },
                    format!("models: '{}' is configured more than once", key),
                ));
            }
        }

        for group in &self.groups {
            if group.models.is_empty() {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    ConfigIssueCode::EmptyGroup {
                        group: group.name.clone(),
                    },
                    format!("groups.{}: group has no models", group.name),
                ));
            }
            let mut members = HashSet::new();
            for key in &group.models {
                if !members.insert(key.as_str()) {
                    issues.push(ConfigIssue::new(
                        Severity::Warning,
                        ConfigIssueCode::DuplicateGroupMember {
                            group: group.name.clone(),
                            key: key.clone(),
                        },
                        format!("groups.{}: '{}' is listed more than once", group.name, key),
                    ));
                    continue;
                }
                if !seen.contains(key) {
                    issues.push(ConfigIssue::new(
                        Severity::Warning,
                        ConfigIssueCode::UnknownGroupMember {
                            group: group.name.clone(),
                            key: key.clone(),
                        },
                        format!(
                            "groups.{}: '{}' does not match any configured model",
                            group.name, key
                        ),
                    ));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> ModelsConfig {
        ModelsConfig {
            models: vec![
                ConfiguredModel::new("openai", "gpt-4o"),
                ConfiguredModel::new("anthropic", "claude-3-5-sonnet").disabled(),
            ],
            groups: vec![ModelGroup {
                name: "coding".to_string(),
                description: None,
                system_prompt: Some("Be precise.".to_string()),
                models: vec!["openai:gpt-4o".to_string()],
            }],
        }
    }

    #[test]
    fn test_find_by_config_key() {
        let config = catalogue();
        assert!(config.find("openai:gpt-4o").is_some());
        assert!(config.find("openai:gpt-5").is_none());
    }

    #[test]
    fn test_to_target_carries_group() {
        let config = catalogue();
        let group = config.group("coding").unwrap();
        let target = config.models[0].to_target(Some(group.group_info()));
        assert_eq!(target.config_key(), "openai:gpt-4o");
        assert_eq!(
            target.group.unwrap().system_prompt.as_deref(),
            Some("Be precise.")
        );
    }

    #[test]
    fn test_valid_catalogue_has_no_issues() {
        assert!(catalogue().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_unknown_group_member_and_duplicates() {
        let mut config = catalogue();
        config.models.push(ConfiguredModel::new("openai", "gpt-4o"));
        config.groups[0].models.push("openai:gpt-9".to_string());

        let issues = config.validate();
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::DuplicateModel { key } if key == "openai:gpt-4o"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::UnknownGroupMember { key, .. } if key == "openai:gpt-9"
        )));
    }

    #[test]
    fn test_validate_reports_repeated_group_member() {
        let mut config = catalogue();
        config.groups[0].models.push("openai:gpt-4o".to_string());

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::DuplicateGroupMember { group, key }
                if group == "coding" && key == "openai:gpt-4o"
        ));
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_validate_empty_model_id_is_error() {
        let config = ModelsConfig {
            models: vec![ConfiguredModel::new("openai", " ")],
            groups: vec![],
        };
        let issues = config.validate();
        assert!(
            issues
                .iter()
                .any(|i| i.severity == Severity::Error && i.code == ConfigIssueCode::EmptyModelId)
        );
    }
}
