// ABOUTME: Anthropic Messages API provider implementation
// ABOUTME: Lifts system messages into the top-level system field and joins text blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole, TokenUsage};
use crate::errors::{AppError, AppResult, ErrorCode};

/// Anthropic API base URL
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Default Claude model
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Pinned API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires `max_tokens`
const DEFAULT_MAX_TOKENS: u32 = 1024;

const SERVICE: &str = "Anthropic";

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Configuration for [`AnthropicProvider`]
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`
    pub api_key: String,
    /// Base URL without the `/v1/messages` suffix
    pub base_url: String,
    /// Default model to use
    pub default_model: String,
    /// Connect and request timeout
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Build a configuration, failing fast when the key is missing
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigMissing` when the API key is absent or empty.
    pub fn new(api_key: Option<&str>, model: Option<&str>) -> AppResult<Self> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::config_missing("ANTHROPIC_API_KEY"))?;

        Ok(Self {
            api_key: api_key.to_owned(),
            base_url: ANTHROPIC_BASE_URL.to_owned(),
            default_model: model.unwrap_or(ANTHROPIC_DEFAULT_MODEL).to_owned(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the connect/request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Anthropic Claude provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AnthropicConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing Anthropic provider: model={}",
            config.default_model
        );

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> AppError {
        error!("Failed to send request to Anthropic: {}", e);
        if e.is_timeout() {
            AppError::external_timeout(SERVICE, self.config.timeout.as_secs())
        } else if e.is_connect() {
            AppError::external_unavailable(
                SERVICE,
                format!("Cannot connect to {}", self.config.base_url),
            )
        } else {
            AppError::external_service(SERVICE, format!("Request failed: {e}"))
        }
    }

    /// Split role-tagged messages into the top-level system prompt and turns
    fn build_request(&self, request: &ChatRequest) -> MessagesRequest {
        let mut system_parts = Vec::new();
        let mut messages = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            match message.role {
                MessageRole::System => system_parts.push(message.content.as_str()),
                MessageRole::User => messages.push(AnthropicMessage {
                    role: "user",
                    content: message.content.clone(),
                }),
                MessageRole::Assistant => messages.push(AnthropicMessage {
                    role: "assistant",
                    content: message.content.clone(),
                }),
            }
        }

        MessagesRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
            messages,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn display_name(&self) -> &'static str {
        "Anthropic Claude"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::empty()
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = "anthropic"))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let body = self.build_request(request);
        debug!(
            "Sending Anthropic request with {} messages, system_prompt={}",
            body.messages.len(),
            body.system.is_some()
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<AnthropicErrorResponse>(&text).map_or_else(
                |_| text.chars().take(200).collect::<String>(),
                |err| format!("{} - {}", err.error.error_type, err.error.message),
            );
            return Err(match status.as_u16() {
                401 | 403 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!("Anthropic authentication failed: {detail}"),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    format!("Anthropic rate limit reached: {detail}"),
                ),
                529 => AppError::external_unavailable(SERVICE, detail),
                _ => AppError::external_service(SERVICE, format!("API error ({status}): {detail}")),
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse Anthropic response: {}", e);
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })?;

        let content = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<String>()
            .trim()
            .to_owned();

        Ok(ChatResponse {
            content,
            model: parsed.model,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.input_tokens + u.output_tokens,
            }),
            finish_reason: parsed.stop_reason,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        // The Messages API has no free ping; a bare request validates the key.
        let probe = ChatRequest::new(vec![super::ChatMessage::user("ping")]).with_max_tokens(1);
        match self.complete(&probe).await {
            Ok(_) => Ok(true),
            Err(e) if e.code == ErrorCode::ExternalAuthFailed => Ok(false),
            Err(e) => Err(e),
        }
    }
}
