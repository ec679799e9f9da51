// ABOUTME: Environment configuration management for the Nutrilog server
// ABOUTME: Parses ports, database URL, provider credentials, and agent limits from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! Environment-based configuration management

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use super::types::{LlmProviderType, SearchBackend};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./nutrilog.db";

/// Default bound on a single gateway call
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// Default number of snippets fetched per food item
pub const DEFAULT_SEARCH_RESULTS: usize = 3;

/// Default number of food items extracted concurrently
pub const DEFAULT_EXTRACTION_CONCURRENCY: usize = 4;

/// Default lifetime of cached USDA search results
pub const DEFAULT_LOOKUP_CACHE_TTL_SECS: u64 = 86_400;

/// Language-model backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Which provider strategy to build
    pub provider: LlmProviderType,
    /// Model override; each provider has its own default
    pub model: Option<String>,
    /// Base URL override (Ollama host, proxy, test server)
    pub base_url: Option<String>,
    /// `OpenAI` API key
    pub openai_api_key: Option<String>,
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,
    /// Connect and request timeout for provider HTTP clients
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            model: None,
            base_url: None,
            openai_api_key: None,
            anthropic_api_key: None,
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }
}

impl LlmSettings {
    /// Same settings with a different provider and optional model
    ///
    /// Used for per-request provider selection; credentials and timeout are kept.
    #[must_use]
    pub fn with_provider(&self, provider: LlmProviderType, model: Option<String>) -> Self {
        let same_provider = provider == self.provider;
        Self {
            provider,
            model: model.or_else(|| same_provider.then(|| self.model.clone()).flatten()),
            base_url: if same_provider {
                self.base_url.clone()
            } else {
                None
            },
            ..self.clone()
        }
    }
}

/// Nutrition lookup backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Which lookup implementation to build
    pub backend: SearchBackend,
    /// USDA `FoodData` Central API key
    pub usda_api_key: Option<String>,
    /// Lifetime of cached lookup results
    pub cache_ttl: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            backend: SearchBackend::default(),
            usda_api_key: None,
            cache_ttl: Duration::from_secs(DEFAULT_LOOKUP_CACHE_TTL_SECS),
        }
    }
}

/// Limits applied by the meal agent for one conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    /// Upper bound on every gateway call
    pub llm_timeout: Duration,
    /// Snippets requested from the lookup per food item
    pub search_results: usize,
    /// Food items extracted at the same time
    pub extraction_concurrency: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            search_results: DEFAULT_SEARCH_RESULTS,
            extraction_concurrency: DEFAULT_EXTRACTION_CONCURRENCY,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// Language-model backend
    pub llm: LlmSettings,
    /// Nutrition lookup backend
    pub search: SearchSettings,
    /// Pipeline limits
    pub agent: AgentConfig,
    /// Comma-separated CORS origins, or `*`
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let timeout_secs: u64 = env_var_or(
            "NUTRILOG_LLM_TIMEOUT_SECS",
            &DEFAULT_LLM_TIMEOUT_SECS.to_string(),
        )
        .parse()
        .context("Invalid NUTRILOG_LLM_TIMEOUT_SECS value")?;
        let llm_timeout = Duration::from_secs(timeout_secs.max(1));

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            llm: LlmSettings {
                provider: LlmProviderType::from_env(),
                model: LlmProviderType::model_from_env(),
                base_url: non_empty_var(LlmProviderType::BASE_URL_ENV_VAR),
                openai_api_key: non_empty_var("OPENAI_API_KEY"),
                anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
                timeout: llm_timeout,
            },
            search: SearchSettings {
                backend: SearchBackend::from_env(),
                usda_api_key: non_empty_var("USDA_API_KEY"),
                cache_ttl: Duration::from_secs(
                    env_var_or(
                        "NUTRILOG_LOOKUP_CACHE_TTL_SECS",
                        &DEFAULT_LOOKUP_CACHE_TTL_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid NUTRILOG_LOOKUP_CACHE_TTL_SECS value")?,
                ),
            },
            agent: AgentConfig {
                llm_timeout,
                search_results: env_var_or(
                    "NUTRILOG_SEARCH_RESULTS",
                    &DEFAULT_SEARCH_RESULTS.to_string(),
                )
                .parse::<usize>()
                .context("Invalid NUTRILOG_SEARCH_RESULTS value")?
                .max(1),
                extraction_concurrency: env_var_or(
                    "NUTRILOG_EXTRACTION_CONCURRENCY",
                    &DEFAULT_EXTRACTION_CONCURRENCY.to_string(),
                )
                .parse::<usize>()
                .context("Invalid NUTRILOG_EXTRACTION_CONCURRENCY value")?
                .max(1),
            },
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Nutrilog Server Configuration: http_port={} database={} llm_provider={} llm_model={} \
             llm_timeout={}s search_backend={} search_results={} extraction_concurrency={}",
            self.http_port,
            if self.database_url.starts_with("sqlite:") {
                "SQLite"
            } else {
                "other"
            },
            self.llm.provider,
            self.llm.model.as_deref().unwrap_or("default"),
            self.agent.llm_timeout.as_secs(),
            self.search.backend,
            self.agent.search_results,
            self.agent.extraction_concurrency,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
