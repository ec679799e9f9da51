// ABOUTME: Generic OpenAI-compatible LLM provider for cloud and local endpoints
// ABOUTME: Serves both OpenAI and Ollama through the chat completions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # `OpenAI`-Compatible Provider
//!
//! One implementation for every endpoint that speaks the `OpenAI` chat
//! completions protocol. Two presets are provided:
//!
//! - **`OpenAI`**: <https://api.openai.com/v1>, API key required
//! - **Ollama**: <http://localhost:11434/v1>, no key
//!
//! Transport failures are classified so the meal agent can tell an
//! unreachable server apart from a slow one:
//!
//! | Failure                       | `ErrorCode`                    |
//! |-------------------------------|--------------------------------|
//! | connection refused / DNS      | `ExternalServiceUnavailable`   |
//! | request exceeded timeout      | `ExternalServiceTimeout`       |
//! | non-2xx status, bad body      | `ExternalServiceError` (or auth/rate-limit codes) |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use super::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage,
};
use crate::errors::{AppError, AppResult, ErrorCode};

// ============================================================================
// Configuration Constants
// ============================================================================

/// `OpenAI` API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default `OpenAI` model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Ollama `OpenAI`-compatible base URL
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Default Ollama model
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2:latest";

/// Default connect/request timeout when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Connection settings for a chat-completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// API root including the version segment, e.g. <http://localhost:11434/v1>
    pub base_url: String,
    /// Bearer token; Ollama runs without one
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider identifier, `openai` or `ollama`
    pub provider_name: &'static str,
    /// Provider display name
    pub display_name: &'static str,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Connect and request timeout
    pub timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Create configuration for `OpenAI`
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigMissing` when the API key is absent or empty.
    pub fn openai(api_key: Option<&str>, model: Option<&str>) -> AppResult<Self> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::config_missing("OPENAI_API_KEY"))?;

        Ok(Self {
            base_url: OPENAI_BASE_URL.to_owned(),
            api_key: Some(api_key.to_owned()),
            default_model: model.unwrap_or(OPENAI_DEFAULT_MODEL).to_owned(),
            provider_name: "openai",
            display_name: "OpenAI",
            capabilities: LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(model: Option<&str>) -> Self {
        Self {
            base_url: OLLAMA_BASE_URL.to_owned(),
            api_key: None,
            default_model: model.unwrap_or(OLLAMA_DEFAULT_MODEL).to_owned(),
            provider_name: "ollama",
            display_name: "Ollama (Local)",
            capabilities: LlmCapabilities::SYSTEM_MESSAGES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
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

// ============================================================================
// Provider Implementation
// ============================================================================

/// Provider speaking the `OpenAI` chat-completions protocol (`OpenAI`, Ollama)
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Build the HTTP client for `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "{} provider configured: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// `{base_url}/{endpoint}` without doubled slashes
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Attach the bearer token when one is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Classify a reqwest transport error
    fn map_transport_error(&self, e: &reqwest::Error) -> AppError {
        error!(
            "Request to {} failed: {}",
            self.config.provider_name, e
        );
        if e.is_timeout() {
            AppError::external_timeout(self.config.display_name, self.config.timeout.as_secs())
        } else if e.is_connect() {
            AppError::external_unavailable(
                self.config.display_name,
                format!(
                    "{} is unreachable at {}; check that the server is running",
                    self.config.display_name, self.config.base_url
                ),
            )
        } else {
            AppError::external_service(self.config.display_name, format!("Request failed: {e}"))
        }
    }

    /// Map a non-2xx answer to an error code the pipeline can act on
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let service = self.config.display_name;
        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            return match status.as_u16() {
                502..=504 => AppError::external_unavailable(
                    service,
                    format!("{service} is not responding (HTTP {status})"),
                ),
                _ => AppError::external_service(
                    service,
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            };
        };

        let message = error_response.error.message;
        match status.as_u16() {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("API authentication failed: {message}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("LLM rate limit reached: {message}"),
            ),
            404 => AppError::not_found(format!("Model or endpoint not found: {message}")),
            _ => AppError::external_service(
                service,
                format!(
                    "{} - {}",
                    error_response
                        .error
                        .error_type
                        .unwrap_or_else(|| "unknown".to_owned()),
                    message
                ),
            ),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let json_mode = request.json_output && self.config.capabilities.supports_json_mode();
        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(
            "Sending chat completion request to {} with {} messages",
            self.config.provider_name,
            openai_request.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            AppError::external_service(
                self.config.display_name,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.config.display_name, "API returned no choices")
        })?;

        let content = choice.message.content.unwrap_or_default().trim().to_owned();

        debug!(
            "{} answered with {} chars (finish_reason={:?})",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        let request = self.add_auth_header(self.client.get(self.api_url("models")));
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;
        Ok(response.status().is_success())
    }
}
