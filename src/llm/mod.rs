// ABOUTME: LLM gateway abstraction for pluggable language-model backends
// ABOUTME: Defines the provider contract, role-tagged messages, and request/response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # LLM Gateway
//!
//! This module defines the contract every language-model backend implements so
//! the meal-logging pipeline can talk to `OpenAI`, Anthropic, Ollama, or the
//! offline stub through one interface.
//!
//! ## Key Concepts
//!
//! - **`LlmProvider`**: Async trait sending role-tagged messages and returning text
//! - **`LlmCapabilities`**: Bitflags describing provider features (JSON mode, system role)
//! - **`ChatMessage`**: One turn of the meal conversation, tagged with its role
//! - **`ChatProvider`**: Strategy selector built from configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutrilog::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn ask(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You are a nutritionist."),
//!         ChatMessage::user("How much protein is in an egg?"),
//!     ]);
//!     let reply = provider.complete(&request).await;
//! }
//! ```

mod anthropic;
mod local;
mod openai_compatible;
pub mod prompts;
mod provider;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use local::LocalProvider;
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::ChatProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    ///
    /// Used to decide how a request is rendered for a given backend.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts `system` role messages inline
        const SYSTEM_MESSAGES = 0b0000_0001;
        /// Provider can be asked to emit a JSON object only
        const JSON_MODE = 0b0000_0010;
        /// Provider runs without network access
        const OFFLINE = 0b0000_0100;
    }
}

impl LlmCapabilities {
    /// Whether the backend can be asked for a bare JSON object
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if system messages are supported inline
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }

    /// Check if the provider works offline
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        self.contains(Self::OFFLINE)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction prepended by the pipeline
    System,
    /// User input message
    User,
    /// Earlier reply from the assistant
    Assistant,
}

impl MessageRole {
    /// Wire name used by every provider API
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged turn of the conversation
///
/// An ordered `Vec<ChatMessage>` (oldest first) is the conversation history
/// handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the turn
    pub role: MessageRole,
    /// Turn text
    pub content: String,
}

impl ChatMessage {
    /// Turn with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Instruction turn
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// One call to a language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model override; the provider default is used when absent
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Cap on generated tokens
    pub max_tokens: Option<u32>,
    /// Ask the provider for a bare JSON object when it supports it
    pub json_output: bool,
}

impl ChatRequest {
    /// Request with provider defaults for everything but the messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            json_output: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap generated tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request JSON-only output
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Text and metadata returned by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text, trimmed
    pub content: String,
    /// Model that answered
    pub model: String,
    /// Token accounting when the backend reports it
    pub usage: Option<TokenUsage>,
    /// Why generation stopped, as reported by the backend
    pub finish_reason: Option<String>,
}

/// Token counts for one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Generated tokens
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// A language-model backend
///
/// Implementations are constructed with validated configuration; a provider
/// that exists is ready to be called. Transport failures must be reported with
/// `ErrorCode::ExternalServiceUnavailable` (unreachable / connection refused)
/// or `ErrorCode::ExternalServiceTimeout` so callers can tell them apart from
/// other upstream errors.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "openai", "anthropic", "ollama")
    fn name(&self) -> &'static str;

    /// Name for logs and error messages
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when a request names none
    fn default_model(&self) -> &str;

    /// Send one request and wait for the whole reply
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse>;

    /// Check if the provider is reachable and its credentials are accepted
    async fn health_check(&self) -> AppResult<bool>;

    /// Send messages and return only the response text
    async fn chat(&self, messages: Vec<ChatMessage>) -> AppResult<String> {
        let response = self.complete(&ChatRequest::new(messages)).await?;
        Ok(response.content)
    }
}
