//! OpenAI-compatible chat completions client
//!
//! Works against any server exposing `POST {base_url}/chat/completions`
//! and `GET {base_url}/models` with bearer authentication.

use super::http::{build_client, read_json, transport_error};
use async_trait::async_trait;
use prism_application::{
    GatewayError, GenerateRequest, Generation, ModelCatalog, ModelListing, ProviderClient,
};
use prism_domain::{ResponseMetadata, TokenUsage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// OpenAI-compatible provider client
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    name: String,
    base_url: String,
    max_tokens: Option<u32>,
    client: Client,
}

impl OpenAiCompatibleClient {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        max_tokens: Option<u32>,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            name: name.into(),
            base_url: base_url.into(),
            max_tokens,
            client: build_client(connect_timeout)?,
        })
    }

    fn build_body<'a>(&self, request: &'a GenerateRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });
        ChatRequest {
            model: &request.model_id,
            messages,
            max_tokens: self.max_tokens,
        }
    }

    fn into_generation(response: ChatResponse) -> Result<Generation, GatewayError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::RequestFailed("response contained no choices".into()))?;

        let mut metadata = ResponseMetadata {
            finish_reason: choice.finish_reason,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            ..Default::default()
        };
        if let Some(model) = response.model {
            metadata.extra.insert("model".into(), model.into());
        }
        if let Some(id) = response.id {
            metadata.extra.insert("id".into(), id.into());
        }

        Ok(Generation::text(choice.message.content.unwrap_or_default()).with_metadata(metadata))
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Generation, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} model={}", url, request.model_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&request.api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(transport_error)?;

        Self::into_generation(read_json(response).await?)
    }

    fn catalog(&self) -> Option<&dyn ModelCatalog> {
        Some(self)
    }
}

#[async_trait]
impl ModelCatalog for OpenAiCompatibleClient {
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelListing>, GatewayError> {
        let url = format!("{}/models", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(transport_error)?;
        let list: ModelList = read_json(response).await?;

        let mut models: Vec<ModelListing> = list
            .data
            .into_iter()
            .map(|m| ModelListing {
                id: m.id,
                description: m.owned_by.map(|o| format!("owned by {}", o)),
            })
            .collect();
        models.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(models)
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    owned_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiCompatibleClient {
        OpenAiCompatibleClient::new(
            "openai",
            "https://api.openai.com/v1",
            Some(1024),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request(system: Option<&str>) -> GenerateRequest {
        GenerateRequest {
            prompt: "Hello".to_string(),
            model_id: "gpt-4o".to_string(),
            system_prompt: system.map(str::to_string),
            api_key: "sk-test".to_string(),
        }
    }

    #[test]
    fn test_body_with_system_prompt() {
        let req = request(Some("Be brief."));
        let body = serde_json::to_value(client().build_body(&req)).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Be brief.");
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[test]
    fn test_body_without_system_prompt() {
        let req = request(None);
        let body = serde_json::to_value(client().build_body(&req)).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_response() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [{"message": {"role": "assistant", "content": "Hi!"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let generation = OpenAiCompatibleClient::into_generation(parsed).unwrap();

        assert_eq!(generation.text, "Hi!");
        let metadata = generation.metadata.unwrap();
        assert_eq!(metadata.finish_reason.as_deref(), Some("stop"));
        assert_eq!(metadata.usage.unwrap().total_tokens, 11);
        assert_eq!(metadata.extra["model"], "gpt-4o-2024-08-06");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            OpenAiCompatibleClient::into_generation(parsed),
            Err(GatewayError::RequestFailed(_))
        ));
    }

    #[test]
    fn test_has_catalog() {
        assert!(client().catalog().is_some());
    }
}
