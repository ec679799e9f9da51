// ABOUTME: Intent classification of a conversation turn via the language model
// ABOUTME: Decodes the model's action object into Clarify, Chitchat, or Search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::ClassificationError;
use super::gateway::Gateway;
use super::sanitizer::sanitize;
use crate::llm::prompts::classification_messages;
use crate::llm::ChatMessage;

/// Reply used when the model's output names no usable action
pub const FALLBACK_REPLY: &str = "I'm not sure how to help with that.";

/// Question used when a CLARIFY action carries none
pub const DEFAULT_QUESTION: &str = "Could you provide more details?";

/// Reply used when a CHITCHAT action carries none
pub const DEFAULT_GREETING: &str = "Hello! Ready to log your meal?";

/// Next step for a conversation turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Ask the user for missing detail
    Clarify {
        /// Question to show the user
        question: String,
    },
    /// Conversational reply, nothing to log
    Chitchat {
        /// Reply to show the user
        reply: String,
    },
    /// Look up and log these food items, in order
    Search {
        /// Free-text item descriptions
        items: Vec<String>,
    },
}

impl Intent {
    fn fallback() -> Self {
        Self::Chitchat {
            reply: FALLBACK_REPLY.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Clarify,
    Search,
    Chitchat,
}

impl Action {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "CLARIFY" => Some(Self::Clarify),
            "SEARCH" => Some(Self::Search),
            "CHITCHAT" => Some(Self::Chitchat),
            _ => None,
        }
    }
}

/// Fields the model may emit; which ones matter depends on `action`
#[derive(Debug, Default, Deserialize)]
struct ActionPayload {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    items: Option<Value>,
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}

/// `items` may be an array of strings or a lone string; anything else, including
/// an array with a single non-string element, is a mismatch
fn decode_items(items: Option<Value>) -> Option<Vec<String>> {
    match items {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::String(item)) => Some(non_blank(Some(item)).into_iter().collect()),
        Some(Value::Array(values)) => {
            let mut items = Vec::with_capacity(values.len());
            for value in values {
                let Value::String(item) = value else {
                    return None;
                };
                items.extend(non_blank(Some(item)));
            }
            Some(items)
        }
        Some(_) => None,
    }
}

/// Decode sanitized model output into an [`Intent`]
///
/// # Errors
///
/// Returns [`ClassificationError::Parse`] only when the text is not JSON at
/// all. Valid JSON without a recognised action, or whose payload does not fit
/// the action, decodes to the fallback chit-chat reply.
pub fn decode_intent(sanitized: &str) -> Result<Intent, ClassificationError> {
    let value: Value = serde_json::from_str(sanitized).map_err(ClassificationError::Parse)?;

    let Ok(payload) = ActionPayload::deserialize(value) else {
        warn!("Classification output has unexpected field types");
        return Ok(Intent::fallback());
    };

    let Some(action) = payload.action.as_deref().and_then(Action::parse) else {
        warn!(action = ?payload.action, "Classification output has no recognised action");
        return Ok(Intent::fallback());
    };

    let intent = match action {
        Action::Clarify => Intent::Clarify {
            question: non_blank(payload.question).unwrap_or_else(|| DEFAULT_QUESTION.to_owned()),
        },
        Action::Chitchat => Intent::Chitchat {
            reply: non_blank(payload.reply).unwrap_or_else(|| DEFAULT_GREETING.to_owned()),
        },
        Action::Search => match decode_items(payload.items) {
            Some(items) => Intent::Search { items },
            None => {
                warn!("SEARCH action carries items of the wrong type");
                Intent::fallback()
            }
        },
    };
    Ok(intent)
}

/// Classify the latest turn given the whole conversation
///
/// The fixed instruction is prepended and the history is forwarded
/// unmodified; resolving references to earlier turns is left to the model.
///
/// # Errors
///
/// Returns [`ClassificationError::Connector`] when the gateway fails and
/// [`ClassificationError::Parse`] when the output is not JSON.
pub async fn classify(
    gateway: &Gateway<'_>,
    history: &[ChatMessage],
) -> Result<Intent, ClassificationError> {
    let raw = gateway.send(classification_messages(history)).await?;
    let sanitized = sanitize(&raw);
    let intent = decode_intent(&sanitized).inspect_err(|_| {
        warn!(
            preview = %raw.chars().take(200).collect::<String>(),
            "Could not parse classification output"
        );
    })?;
    debug!(?intent, "Classified conversation turn");
    Ok(intent)
}
