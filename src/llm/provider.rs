// ABOUTME: Unified LLM provider selector built from validated configuration
// ABOUTME: Dispatches to OpenAI, Ollama, Anthropic, or the offline stub
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # LLM Provider Selector
//!
//! `ChatProvider` is the strategy chosen at construction time from
//! [`LlmSettings`]. Credentials are validated here, so a missing API key is
//! reported when the provider is built and never during a chat call.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutrilog::config::{LlmProviderType, LlmSettings};
//! use nutrilog::llm::{ChatMessage, ChatProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nutrilog::errors::AppError> {
//!     let settings = LlmSettings {
//!         provider: LlmProviderType::Ollama,
//!         ..LlmSettings::default()
//!     };
//!     let provider = ChatProvider::from_config(&settings)?;
//!     let reply = provider.chat(vec![ChatMessage::user("Hello!")]).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    AnthropicConfig, AnthropicProvider, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider,
    LocalProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use crate::config::{LlmProviderType, LlmSettings};
use crate::errors::AppResult;

/// Unified chat provider over every supported backend
pub enum ChatProvider {
    /// `OpenAI` chat completions
    OpenAi(OpenAiCompatibleProvider),
    /// Ollama through its `OpenAI`-compatible endpoint
    Ollama(OpenAiCompatibleProvider),
    /// Anthropic Messages API
    Anthropic(AnthropicProvider),
    /// Offline stub
    Local(LocalProvider),
}

impl ChatProvider {
    /// Create a provider from settings
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigMissing` when a cloud provider is selected
    /// without its API key, or an internal error if the HTTP client cannot be
    /// built.
    pub fn from_config(settings: &LlmSettings) -> AppResult<Self> {
        let model = settings.model.as_deref();
        let provider = match settings.provider {
            LlmProviderType::OpenAi => {
                let mut config =
                    OpenAiCompatibleConfig::openai(settings.openai_api_key.as_deref(), model)?
                        .with_timeout(settings.timeout);
                if let Some(base_url) = &settings.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Self::OpenAi(OpenAiCompatibleProvider::new(config)?)
            }
            LlmProviderType::Ollama => {
                let mut config =
                    OpenAiCompatibleConfig::ollama(model).with_timeout(settings.timeout);
                if let Some(base_url) = &settings.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Self::Ollama(OpenAiCompatibleProvider::new(config)?)
            }
            LlmProviderType::Anthropic => {
                let mut config =
                    AnthropicConfig::new(settings.anthropic_api_key.as_deref(), model)?
                        .with_timeout(settings.timeout);
                if let Some(base_url) = &settings.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Self::Anthropic(AnthropicProvider::new(config)?)
            }
            LlmProviderType::Local => Self::Local(LocalProvider::new()),
        };

        info!(
            provider = provider.name(),
            model = provider.default_model(),
            "LLM provider ready"
        );
        Ok(provider)
    }

    /// Create a provider, falling back to the offline stub on failure
    ///
    /// Used for per-request provider selection, where a misconfigured
    /// provider must not fail the whole request.
    #[must_use]
    pub fn from_config_or_local(settings: &LlmSettings) -> Self {
        Self::from_config(settings).unwrap_or_else(|e| {
            warn!(
                requested = %settings.provider,
                error = %e,
                "Falling back to local provider"
            );
            Self::Local(LocalProvider::new())
        })
    }

    /// Get the provider type
    #[must_use]
    pub const fn provider_type(&self) -> LlmProviderType {
        match self {
            Self::OpenAi(_) => LlmProviderType::OpenAi,
            Self::Ollama(_) => LlmProviderType::Ollama,
            Self::Anthropic(_) => LlmProviderType::Anthropic,
            Self::Local(_) => LlmProviderType::Local,
        }
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::OpenAi(p) | Self::Ollama(p) => p,
            Self::Anthropic(p) => p,
            Self::Local(p) => p,
        }
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatProvider")
            .field("provider", &self.provider_type())
            .field("model", &self.default_model())
            .finish()
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn display_name(&self) -> &'static str {
        self.inner().display_name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.inner().capabilities()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.inner().complete(request).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner().health_check().await
    }
}
