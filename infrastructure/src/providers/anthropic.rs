//! Anthropic Messages API client

use super::http::{build_client, read_json, transport_error};
use async_trait::async_trait;
use prism_application::{GatewayError, GenerateRequest, Generation, ProviderClient};
use prism_domain::{ResponseMetadata, TokenUsage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic provider client. Has no model catalogue.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    name: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

impl AnthropicClient {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        max_tokens: Option<u32>,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            name: name.into(),
            base_url: base_url.into(),
            max_tokens: max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            client: build_client(connect_timeout)?,
        })
    }

    fn build_body<'a>(&self, request: &'a GenerateRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &request.model_id,
            max_tokens: self.max_tokens,
            system: request.system_prompt.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        }
    }

    fn into_generation(response: MessagesResponse) -> Generation {
        let text = response
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let mut metadata = ResponseMetadata {
            finish_reason: response.stop_reason,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.input_tokens + u.output_tokens,
            }),
            ..Default::default()
        };
        if let Some(model) = response.model {
            metadata.extra.insert("model".into(), model.into());
        }
        if let Some(id) = response.id {
            metadata.extra.insert("id".into(), id.into());
        }

        Generation::text(text).with_metadata(metadata)
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Generation, GatewayError> {
        let url = format!("{}/messages", self.base_url);
        debug!("POST {} model={}", url, request.model_id);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &request.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(transport_error)?;

        Ok(Self::into_generation(read_json(response).await?))
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AnthropicClient {
        AnthropicClient::new(
            "anthropic",
            "https://api.anthropic.com/v1",
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_body_shape() {
        let req = GenerateRequest {
            prompt: "Hello".to_string(),
            model_id: "claude-3-5-sonnet-latest".to_string(),
            system_prompt: Some("Be brief.".to_string()),
            api_key: "sk-ant".to_string(),
        };
        let body = serde_json::to_value(client().build_body(&req)).unwrap();
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["system"], "Be brief.");
        assert_eq!(body["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_parse_response_joins_text_blocks() {
        let raw = r#"{
            "id": "msg_1",
            "model": "claude-3-5-sonnet-20241022",
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "world"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 4}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let generation = AnthropicClient::into_generation(parsed);

        assert_eq!(generation.text, "Hello, world");
        let metadata = generation.metadata.unwrap();
        assert_eq!(metadata.finish_reason.as_deref(), Some("end_turn"));
        assert_eq!(metadata.usage.unwrap().total_tokens, 14);
    }

    #[test]
    fn test_has_no_catalog() {
        assert!(client().catalog().is_none());
    }
}
