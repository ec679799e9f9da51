// ABOUTME: Main library entry point for the Nutrilog meal-logging server
// ABOUTME: Turns chat about food into nutrition drafts and stores confirmed meals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

#![deny(unsafe_code)]

//! # Nutrilog
//!
//! A conversational meal logger. The user describes what they ate; a
//! language model decides whether to ask a question, chat, or look the food
//! up; each food item is resolved into nutrition facts from web snippets; and
//! the items are summed into a meal draft the user confirms.
//!
//! ## Architecture
//!
//! - **agent**: the classify, extract, synthesize pipeline
//! - **llm**: provider trait and OpenAI-compatible, Anthropic, and offline backends
//! - **external**: nutrition snippet lookup (`DuckDuckGo`, USDA)
//! - **database**: `SQLite` storage for entries and chat logs
//! - **routes**: the axum HTTP API
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nutrilog::agent::MealAgent;
//! use nutrilog::config::ServerConfig;
//! use nutrilog::external::lookup_from_config;
//! use nutrilog::llm::{ChatMessage, ChatProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let provider = Arc::new(ChatProvider::from_config(&config.llm)?);
//!     let lookup = lookup_from_config(&config.search)?;
//!     let agent = MealAgent::new(provider, lookup, config.agent);
//!
//!     let result = agent.process(&[ChatMessage::user("2 boiled eggs")]).await;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

/// Meal-logging pipeline
pub mod agent;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Unified error handling
pub mod errors;

/// Nutrition snippet lookup backends
pub mod external;

/// Nutrition calculations
pub mod intelligence;

/// Language model providers and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Data models
pub mod models;

/// HTTP routes
pub mod routes;
