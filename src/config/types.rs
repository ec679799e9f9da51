// ABOUTME: Core configuration type definitions for provider and search backend selection
// ABOUTME: Contains LlmProviderType and SearchBackend enums parsed from environment strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// LLM provider selection for the meal-logging agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Offline stub that never leaves the process (default)
    #[default]
    Local,
    /// Ollama via its `OpenAI`-compatible endpoint
    Ollama,
    /// `OpenAI` chat completions
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "NUTRILOG_LLM_PROVIDER";

    /// Environment variable for model selection
    pub const MODEL_ENV_VAR: &'static str = "NUTRILOG_LLM_MODEL";

    /// Environment variable overriding the provider base URL
    pub const BASE_URL_ENV_VAR: &'static str = "NUTRILOG_LLM_BASE_URL";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Self::Ollama,
            "openai" | "gpt" => Self::OpenAi,
            "anthropic" | "claude" => Self::Anthropic,
            _ => Self::Local, // Default fallback (including "local")
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Get model from environment, `None` when unset or empty
    #[must_use]
    pub fn model_from_env() -> Option<String> {
        env::var(Self::MODEL_ENV_VAR)
            .ok()
            .filter(|model| !model.trim().is_empty())
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Local => write!(f, "local"),
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Search backend used for nutrition lookups
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// `DuckDuckGo` instant answers (no key required, default)
    #[default]
    DuckDuckGo,
    /// USDA `FoodData` Central (requires `USDA_API_KEY`)
    Usda,
}

impl SearchBackend {
    /// Environment variable name for search backend selection
    pub const ENV_VAR: &'static str = "NUTRILOG_SEARCH_BACKEND";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "usda" | "fdc" => Self::Usda,
            _ => Self::DuckDuckGo,
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }
}

impl Display for SearchBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::DuckDuckGo => write!(f, "duckduckgo"),
            Self::Usda => write!(f, "usda"),
        }
    }
}
