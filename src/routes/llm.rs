// ABOUTME: Raw language model proxy route
// ABOUTME: Forwards posted messages to a provider and returns its reply text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ServerResources;
use crate::config::LlmProviderType;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatProvider, LlmProvider};

/// Optional provider selection in the query string
#[derive(Debug, Default, Deserialize)]
pub struct ProviderQuery {
    /// Provider name (`local`, `ollama`, `openai`, `anthropic`)
    pub provider: Option<String>,
    /// Model override
    pub model: Option<String>,
}

/// Messages to forward
#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    /// Conversation, oldest first
    pub messages: Vec<ChatMessage>,
}

/// Provider reply
#[derive(Debug, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// Raw reply text
    pub reply: String,
}

/// LLM proxy routes implementation
pub struct LlmRoutes;

impl LlmRoutes {
    /// Create LLM proxy routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/llm/chat", post(Self::handle_chat))
            .with_state(resources)
    }

    /// Unlike the chat route, a misconfigured provider is an error here
    async fn handle_chat(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ProviderQuery>,
        Json(request): Json<ProxyRequest>,
    ) -> AppResult<Json<ProxyResponse>> {
        if request.messages.is_empty() {
            return Err(AppError::invalid_input("messages must not be empty"));
        }

        let reply = if query.provider.is_none() && query.model.is_none() {
            resources.agent.provider().chat(request.messages).await?
        } else {
            let provider_type = query
                .provider
                .as_deref()
                .map_or(resources.llm_settings.provider, LlmProviderType::from_str_or_default);
            let settings = resources.llm_settings.with_provider(provider_type, query.model);
            ChatProvider::from_config(&settings)?
                .chat(request.messages)
                .await?
        };

        Ok(Json(ProxyResponse { reply }))
    }
}
