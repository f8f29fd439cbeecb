//! Anthropic chart advisor over the Messages API.

use super::{ChartAdvisor, build_chart_prompt, parse_chart_spec, require_api_key};
use crate::chart::{ChartRequest, ChartSpec};
use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";

/// Value of the required `anthropic-version` header.
const API_VERSION: &str = "2023-06-01";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_TEMPERATURE: f32 = 0.2;

const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub model: String,
    /// Temperature for response generation (0.0 - 1.0).
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AnthropicConfig {
    pub fn builder() -> AnthropicConfigBuilder {
        AnthropicConfigBuilder::default()
    }
}

/// Builder for [`AnthropicConfig`].
#[derive(Default)]
pub struct AnthropicConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl AnthropicConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> AnthropicConfig {
        AnthropicConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Anthropic chart advisor.
///
/// # Example
///
/// ```rust,ignore
/// use plotline::ai::AnthropicProvider;
/// use plotline::recommend_chart;
///
/// let provider = AnthropicProvider::new(std::env::var("ANTHROPIC_API_KEY")?)?;
/// let recommendation = recommend_chart(&dataset, Some(&provider), 20);
/// ```
pub struct AnthropicProvider {
    api_key: String,
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot
    /// be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, AnthropicConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: AnthropicConfig) -> Result<Self> {
        let api_key = require_api_key(api_key.into(), "Anthropic")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    fn build_request(&self, prompt: String) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }

    fn call_api(&self, prompt: String) -> Result<String> {
        let request = self.build_request(prompt);

        let response = self
            .client
            .post(&self.config.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Anthropic API Error {}: {}", status, response.text()?));
        }

        let result: MessagesResponse = response.json()?;
        first_text_block(result)
    }
}

fn first_text_block(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| anyhow!("No text content in Anthropic API response"))
}

impl ChartAdvisor for AnthropicProvider {
    fn recommend(&self, request: &ChartRequest<'_>) -> Result<ChartSpec> {
        let prompt = build_chart_prompt(request)?;
        let text = self.call_api(prompt)?;
        debug!("Anthropic responded with {} bytes", text.len());
        parse_chart_spec(&text)
    }

    fn name(&self) -> &str {
        "Anthropic"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartType;

    #[test]
    fn test_first_text_block() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "```json\n{\"chart_type\": \"scatter\", \"x\": \"a\", \"y\": \"b\"}\n```"}
            ],
            "stop_reason": "end_turn"
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        let text = first_text_block(response).unwrap();
        let spec = parse_chart_spec(&text).unwrap();
        assert_eq!(spec.chart_type, ChartType::Scatter);
    }

    #[test]
    fn test_skips_non_text_blocks() {
        let json = r#"{"content": [
            {"type": "thinking", "thinking": "hmm"},
            {"type": "text", "text": "second"}
        ]}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_text_block(response).unwrap(), "second");
    }

    #[test]
    fn test_empty_content_is_error() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(first_text_block(response).is_err());

        let response: MessagesResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(first_text_block(response).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let provider = AnthropicProvider::new("test-key").unwrap();
        let json = serde_json::to_value(provider.build_request("prompt".to_string())).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "prompt");
    }

    #[test]
    fn test_config_builder() {
        let config = AnthropicConfig::builder()
            .model("claude-3-haiku-20240307")
            .max_tokens(256)
            .timeout_secs(5)
            .build();
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(AnthropicProvider::new("  ").is_err());
        assert!(AnthropicProvider::new("your-api-key-here").is_err());
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = AnthropicProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "Anthropic");
        assert_eq!(provider.model(), Some(DEFAULT_MODEL));
    }
}
