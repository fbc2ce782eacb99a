//! Model target value object

use serde::{Deserialize, Serialize};

/// Group membership attached to a target selected through a named group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Group name as declared in configuration
    pub name: String,
    /// System prompt shared by every model of the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl GroupInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// A single provider + model pairing that receives the prompt (Value Object)
///
/// Identified by its config key `provider:model_id`. Targets are immutable
/// once selected for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTarget {
    pub provider: String,
    pub model_id: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupInfo>,
}

impl ModelTarget {
    pub fn new(provider: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model_id: model_id.into(),
            enabled: true,
            group: None,
        }
    }

    pub fn with_group(mut self, group: GroupInfo) -> Self {
        self.group = Some(group);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Canonical `provider:model_id` identifier
    pub fn config_key(&self) -> String {
        config_key(&self.provider, &self.model_id)
    }
}

impl std::fmt::Display for ModelTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model_id)
    }
}

/// Build a config key from its parts.
pub fn config_key(provider: &str, model_id: &str) -> String {
    format!("{}:{}", provider, model_id)
}

/// Split a config key at the first `:`.
///
/// Model ids may themselves contain `:` (e.g. `ollama:llama3:8b`), so only
/// the first separator is significant.
pub fn split_config_key(key: &str) -> Option<(&str, &str)> {
    let (provider, model_id) = key.split_once(':')?;
    if provider.is_empty() || model_id.is_empty() {
        return None;
    }
    Some((provider, model_id))
}
