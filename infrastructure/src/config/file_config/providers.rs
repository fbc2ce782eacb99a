//! Provider configuration from TOML (`[providers.<name>]` sections)

use serde::{Deserialize, Serialize};

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `POST /chat/completions` (OpenAI, OpenRouter, Groq, local servers...)
    OpenAi,
    /// `POST /messages`
    Anthropic,
}

impl ProviderKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_lowercase().as_str() {
            "openai" | "openai-compatible" | "openai_compatible" => Some(ProviderKind::OpenAi),
            "anthropic" => Some(ProviderKind::Anthropic),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

/// Raw configuration for one provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// `"openai"` or `"anthropic"`; inferred from the provider name when unset
    pub kind: Option<String>,
    /// API base URL; the kind's public endpoint when unset
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Max tokens per response
    pub max_tokens: Option<u32>,
}

impl FileProviderConfig {
    /// The protocol for provider `name`, or the unparseable `kind` value.
    pub fn resolve_kind(&self, name: &str) -> Result<ProviderKind, String> {
        match &self.kind {
            Some(kind) => ProviderKind::parse(kind).ok_or_else(|| kind.clone()),
            None if name.eq_ignore_ascii_case("anthropic") => Ok(ProviderKind::Anthropic),
            None => Ok(ProviderKind::OpenAi),
        }
    }

    pub fn base_url_or(&self, kind: ProviderKind) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }
}
