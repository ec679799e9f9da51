// ABOUTME: Prompts for the meal-logging pipeline loaded at compile time
// ABOUTME: Provides the intent classification instruction and the nutrition extraction template
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

use super::ChatMessage;

/// Instruction prepended to the conversation when classifying a turn
///
/// Tells the model it is a meal-logging assistant that must answer with a
/// single raw JSON object carrying one of the `CLARIFY`, `SEARCH` or
/// `CHITCHAT` actions, and that missing preparation or quantity detail is a
/// reason to ask rather than guess.
pub const MEAL_INTENT_PROMPT: &str = include_str!("meal_intent.md");

/// Template for the per-item extraction request
///
/// `{item}` and `{snippets}` are substituted by [`extraction_messages`].
pub const NUTRITION_EXTRACTION_TEMPLATE: &str = include_str!("nutrition_extraction.md");

/// User turn sent after the extraction instruction
const EXTRACTION_TRIGGER: &str = "Extract nutrition.";

/// Build the classification request: the fixed instruction, then the history unmodified
#[must_use]
pub fn classification_messages(history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(MEAL_INTENT_PROMPT));
    messages.extend_from_slice(history);
    messages
}

/// Build the single-turn extraction request for one food item
#[must_use]
pub fn extraction_messages(item: &str, snippets: &[String]) -> Vec<ChatMessage> {
    let instruction = NUTRITION_EXTRACTION_TEMPLATE
        .replace("{item}", item)
        .replace("{snippets}", &snippets.join("\n"));
    vec![
        ChatMessage::system(instruction),
        ChatMessage::user(EXTRACTION_TRIGGER),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_classification_prepends_instruction_and_keeps_history() {
        let history = vec![
            ChatMessage::user("I had eggs"),
            ChatMessage::assistant("How were they cooked?"),
            ChatMessage::user("it was fried"),
        ];
        let messages = classification_messages(&history);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("CLARIFY"));
        assert_eq!(&messages[1..], history.as_slice());
    }

    #[test]
    fn test_extraction_prompt_embeds_item_and_snippets() {
        let snippets = vec!["Title: Egg\nSnippet: 78 kcal".to_owned(), "second".to_owned()];
        let messages = extraction_messages("2 boiled eggs", &snippets);

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("'2 boiled eggs'"));
        assert!(messages[0].content.contains("Snippet: 78 kcal\nsecond"));
        assert!(!messages[0].content.contains("{item}"));
        assert!(!messages[0].content.contains("{snippets}"));
        assert_eq!(messages[1].role, MessageRole::User);
    }
}
