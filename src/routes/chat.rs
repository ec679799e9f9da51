// ABOUTME: Chat route handlers for conversational meal logging
// ABOUTME: Runs the meal agent on the posted history and logs the exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! Chat routes
//!
//! `POST /api/chat/message` takes the full conversation and returns the
//! agent's reply, with a meal draft when the turn described food.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use super::ServerResources;
use crate::agent::AgentResult;
use crate::config::LlmProviderType;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatProvider, LlmProvider, MessageRole};

/// Request body for a chat turn
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    /// Conversation so far, oldest first
    pub messages: Vec<ChatMessage>,
    /// Provider override for this request
    #[serde(default)]
    pub provider: Option<String>,
    /// Model override for this request
    #[serde(default)]
    pub model: Option<String>,
}

/// Chat routes implementation
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat/message", post(Self::handle_message))
            .with_state(resources)
    }

    async fn handle_message(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ChatTurnRequest>,
    ) -> AppResult<Json<AgentResult>> {
        let Some(last) = request.messages.last() else {
            return Err(AppError::invalid_input("messages must not be empty"));
        };

        let chat_logs = resources.database.chat_logs();
        let log_id = if last.role == MessageRole::User {
            chat_logs.log_user_message(&last.content).await
        } else {
            None
        };

        let agent = if request.provider.is_some() || request.model.is_some() {
            let provider_type = request
                .provider
                .as_deref()
                .map_or(resources.llm_settings.provider, LlmProviderType::from_str_or_default);
            let settings = resources
                .llm_settings
                .with_provider(provider_type, request.model.clone());
            resources
                .agent
                .with_provider(Arc::new(ChatProvider::from_config_or_local(&settings)))
        } else {
            resources.agent.clone()
        };

        info!(
            provider = agent.provider().name(),
            turns = request.messages.len(),
            "Processing chat turn"
        );
        let result = agent.process(&request.messages).await;

        chat_logs.log_bot_response(log_id, &result.text).await;
        Ok(Json(result))
    }
}
