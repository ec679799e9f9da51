// ABOUTME: Meal-logging pipeline turning chat history into clarifications, replies, or drafts
// ABOUTME: Hosts the sanitizer, intent classifier, extractor, synthesizer, and orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # Meal Agent Pipeline
//!
//! - [`sanitizer`]: pulls the JSON object out of noisy model output
//! - [`intent`]: decides whether to clarify, chat, or search
//! - [`extractor`]: builds one ingredient record per food item
//! - [`synthesizer`]: sums ingredient records into a meal draft
//! - [`orchestrator`]: runs the above for one conversational turn

/// Stage-specific error types
pub mod errors;
/// Extraction of one ingredient record per food item
pub mod extractor;
/// Deadline-bounded language model calls
pub mod gateway;
/// Intent classification
pub mod intent;
/// Pipeline entry point
pub mod orchestrator;
/// JSON extraction from model output
pub mod sanitizer;
/// Meal draft aggregation
pub mod synthesizer;

pub use errors::{
    ClassificationError, ConnectorError, ConnectorErrorKind, ExtractionError, NoDataError,
};
pub use intent::Intent;
pub use orchestrator::{AgentResult, MealAgent};
pub use sanitizer::sanitize;
pub use synthesizer::{synthesize, MealDraft};
