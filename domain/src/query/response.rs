//! LLM response value object

use crate::core::target::{GroupInfo, ModelTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token accounting reported by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Optional facts about how a response was produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Provider-specific extras, kept sorted by key
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ResponseMetadata {
    pub fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Pretty-printed JSON dump with keys in a stable (sorted) order.
    pub fn to_canonical_json(&self) -> String {
        match serde_json::to_value(self) {
            Ok(value) => serde_json::to_string_pretty(&sort_keys(value)).unwrap_or_default(),
            Err(_) => String::from("{}"),
        }
    }
}

fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
        }
        other => other,
    }
}

/// One model's answer (or failure) for a run
///
/// Produced exactly once per target by the query executor and immutable
/// afterwards. A failed target carries `error` and an empty `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub provider: String,
    pub model_id: String,
    pub config_key: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupInfo>,
    /// System prompt actually sent with the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl LlmResponse {
    pub fn success(target: &ModelTarget, text: impl Into<String>) -> Self {
        Self {
            provider: target.provider.clone(),
            model_id: target.model_id.clone(),
            config_key: target.config_key(),
            text: text.into(),
            error: None,
            group: target.group.clone(),
            system_prompt: group_prompt(target),
            metadata: None,
        }
    }

    pub fn failure(target: &ModelTarget, error: impl Into<String>) -> Self {
        Self {
            provider: target.provider.clone(),
            model_id: target.model_id.clone(),
            config_key: target.config_key(),
            text: String::new(),
            error: Some(error.into()),
            group: target.group.clone(),
            system_prompt: group_prompt(target),
            metadata: None,
        }
    }

    /// Record the effective system prompt; `None` means none was sent
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

fn group_prompt(target: &ModelTarget) -> Option<String> {
    target.group.as_ref().and_then(|g| g.system_prompt.clone())
}
