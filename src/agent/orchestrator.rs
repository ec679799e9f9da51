// ABOUTME: Conversation orchestrator turning a message history into one agent result
// ABOUTME: Sequences classification, per-item extraction, and draft synthesis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # Meal Agent
//!
//! One call to [`MealAgent::process`] handles one conversational turn:
//!
//! ```text
//! classify ──┬─ Clarify  ──> question
//!            ├─ Chitchat ──> reply
//!            └─ Search   ──> extract each item ──> synthesize ──> draft
//! ```
//!
//! Every stage failure is turned into user-facing text here; `process`
//! always returns an [`AgentResult`].

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::errors::{ClassificationError, ConnectorErrorKind};
use super::extractor::extract;
use super::gateway::Gateway;
use super::intent::{classify, Intent};
use super::synthesizer::{synthesize, MealDraft};
use crate::config::AgentConfig;
use crate::external::NutritionLookup;
use crate::llm::{ChatMessage, LlmProvider};

/// Shown when the model backend refuses the connection or is unreachable
pub const CONNECTION_FAILED_TEXT: &str =
    "I cannot connect to the AI service. Please ensure the language model provider is running and reachable.";

/// Shown when the model backend does not answer in time
pub const TIMEOUT_TEXT: &str =
    "The AI service took too long to respond. Please try again in a moment.";

/// Shown when classification output cannot be used
pub const NOT_UNDERSTOOD_TEXT: &str =
    "I'm having trouble understanding. Could you please specify what you ate?";

/// Shown when no item produced a nutrition record
pub const NO_NUTRITION_TEXT: &str =
    "I couldn't find nutritional info for that. Could you try again?";

/// Outcome of one conversational turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResult {
    /// Message for the user
    pub text: String,
    /// Computed meal awaiting confirmation, when the turn logged food
    pub draft_entry: Option<MealDraft>,
}

impl AgentResult {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            draft_entry: None,
        }
    }

    fn draft(draft: MealDraft) -> Self {
        Self {
            text: format!(
                "I've calculated the nutrition for {}. Please confirm the details below.",
                draft.name()
            ),
            draft_entry: Some(draft),
        }
    }
}

/// The meal-logging pipeline
///
/// Holds no per-conversation state; the caller supplies the full history on
/// every turn.
#[derive(Clone)]
pub struct MealAgent {
    provider: Arc<dyn LlmProvider>,
    lookup: Arc<dyn NutritionLookup>,
    config: AgentConfig,
}

impl MealAgent {
    /// Create an agent over an injected provider and lookup
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        lookup: Arc<dyn NutritionLookup>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            lookup,
            config,
        }
    }

    /// Provider answering this agent's requests
    #[must_use]
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Same agent with another provider
    #[must_use]
    pub fn with_provider(&self, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            lookup: Arc::clone(&self.lookup),
            config: self.config,
        }
    }

    /// Handle one conversational turn
    #[instrument(skip_all, fields(provider = self.provider.name(), turns = history.len()))]
    pub async fn process(&self, history: &[ChatMessage]) -> AgentResult {
        let gateway = Gateway::new(self.provider.as_ref(), self.config.llm_timeout);

        let intent = match classify(&gateway, history).await {
            Ok(intent) => intent,
            Err(e) => return Self::classification_failure(&e),
        };

        match intent {
            Intent::Clarify { question } => AgentResult::text(question),
            Intent::Chitchat { reply } => AgentResult::text(reply),
            Intent::Search { items } => self.search(&gateway, items).await,
        }
    }

    fn classification_failure(error: &ClassificationError) -> AgentResult {
        match error {
            ClassificationError::Connector(e) => {
                error!(kind = ?e.kind, error = %e, "Language model call failed during classification");
                match e.kind {
                    ConnectorErrorKind::ConnectionRefused => {
                        AgentResult::text(CONNECTION_FAILED_TEXT)
                    }
                    ConnectorErrorKind::Timeout => AgentResult::text(TIMEOUT_TEXT),
                    ConnectorErrorKind::Transient => AgentResult::text(NOT_UNDERSTOOD_TEXT),
                }
            }
            ClassificationError::Parse(e) => {
                warn!(error = %e, "Classification output was not JSON");
                AgentResult::text(NOT_UNDERSTOOD_TEXT)
            }
        }
    }

    /// Extract every item, keep successes in input order, then synthesize
    async fn search(&self, gateway: &Gateway<'_>, items: Vec<String>) -> AgentResult {
        let limit = self.config.search_results;
        let lookup = self.lookup.as_ref();

        // `buffered` yields in input order regardless of completion order.
        let outcomes: Vec<_> = stream::iter(items)
            .map(|item| async move {
                let outcome = extract(gateway, lookup, &item, limit).await;
                (item, outcome)
            })
            .buffered(self.config.extraction_concurrency.max(1))
            .collect()
            .await;

        let requested = outcomes.len();
        let records: Vec<_> = outcomes
            .into_iter()
            .filter_map(|(item, outcome)| {
                outcome
                    .map_err(|e| warn!(item = %item, error = %e, "Skipping item"))
                    .ok()
            })
            .collect();

        info!(requested, extracted = records.len(), "Extraction finished");

        match synthesize(records) {
            Ok(draft) => AgentResult::draft(draft),
            Err(e) => {
                warn!(error = %e, "No nutrition data for any item");
                AgentResult::text(NO_NUTRITION_TEXT)
            }
        }
    }
}
