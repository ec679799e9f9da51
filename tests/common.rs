// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory databases, and agent construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `nutrilog`

use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use nutrilog::{
    agent::MealAgent,
    config::{AgentConfig, LlmSettings},
    database::Database,
    external::NutritionLookup,
    llm::LlmProvider,
    routes::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Agent limits suited to tests: short deadline, small fan-out
pub fn test_agent_config() -> AgentConfig {
    AgentConfig {
        llm_timeout: Duration::from_secs(2),
        search_results: 3,
        extraction_concurrency: 4,
    }
}

/// Agent over the given doubles
pub fn create_test_agent(
    provider: Arc<dyn LlmProvider>,
    lookup: Arc<dyn NutritionLookup>,
) -> MealAgent {
    init_test_logging();
    MealAgent::new(provider, lookup, test_agent_config())
}

/// Server resources over an in-memory database
pub async fn create_test_resources(
    provider: Arc<dyn LlmProvider>,
    lookup: Arc<dyn NutritionLookup>,
) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        database,
        create_test_agent(provider, lookup),
        LlmSettings::default(),
    )))
}
