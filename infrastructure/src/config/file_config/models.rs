//! Model and group configuration from TOML (`[[models]]`, `[groups.<name>]`)

use prism_domain::{ConfiguredModel, ModelGroup};
use serde::{Deserialize, Serialize};

fn enabled_by_default() -> bool {
    true
}

/// One `[[models]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModelEntry {
    pub provider: String,
    pub model_id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Overrides the provider's API key variable for this model only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl FileModelEntry {
    pub fn to_configured(&self) -> ConfiguredModel {
        ConfiguredModel {
            provider: self.provider.trim().to_string(),
            model_id: self.model_id.trim().to_string(),
            enabled: self.enabled,
            api_key_env: self.api_key_env.clone(),
        }
    }
}

/// One `[groups.<name>]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGroupConfig {
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    /// Member config keys (`provider:model_id`)
    pub models: Vec<String>,
}

impl FileGroupConfig {
    pub fn to_group(&self, name: &str) -> ModelGroup {
        ModelGroup {
            name: name.to_string(),
            description: self.description.clone(),
            system_prompt: self
                .system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty()),
            models: self.models.iter().map(|k| k.trim().to_string()).collect(),
        }
    }
}
