// ABOUTME: Deadline-bounded access to the language model for pipeline stages
// ABOUTME: Wraps every provider call in a timeout and classifies transport failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use super::errors::ConnectorError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// A provider plus the deadline applied to each request
#[derive(Clone, Copy)]
pub struct Gateway<'a> {
    provider: &'a dyn LlmProvider,
    deadline: Duration,
}

impl<'a> Gateway<'a> {
    /// Bind a provider to a per-call deadline
    #[must_use]
    pub const fn new(provider: &'a dyn LlmProvider, deadline: Duration) -> Self {
        Self { provider, deadline }
    }

    /// Send messages asking for a JSON object and return the raw reply text
    ///
    /// No retries: a failed or expired call is final for the calling stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectorError`] when the provider fails or the deadline passes.
    pub async fn send(&self, messages: Vec<ChatMessage>) -> Result<String, ConnectorError> {
        let request = ChatRequest::new(messages).with_json_output();
        debug!(
            provider = self.provider.name(),
            messages = request.messages.len(),
            "Calling language model"
        );
        match timeout(self.deadline, self.provider.complete(&request)).await {
            Ok(Ok(response)) => Ok(response.content),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ConnectorError::timeout(self.deadline.as_secs())),
        }
    }
}
