// ABOUTME: Offline stand-in provider used when no real language model is configured
// ABOUTME: Always answers with a CHITCHAT action asking the user to configure a provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use async_trait::async_trait;
use serde_json::json;

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use crate::errors::AppResult;

const LOCAL_MODEL: &str = "local-stub";

const CONFIGURE_PROVIDER_REPLY: &str = "I am a dummy local model. Please configure a real LLM \
                                        provider (OpenAI, Anthropic or Ollama) to log meals.";

/// Offline provider that never performs network I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProvider;

impl LocalProvider {
    /// Create the stub provider
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    fn display_name(&self) -> &'static str {
        "Local stub"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::OFFLINE | LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        LOCAL_MODEL
    }

    async fn complete(&self, _request: &ChatRequest) -> AppResult<ChatResponse> {
        let content = json!({ "action": "CHITCHAT", "reply": CONFIGURE_PROVIDER_REPLY });
        Ok(ChatResponse {
            content: content.to_string(),
            model: LOCAL_MODEL.to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
