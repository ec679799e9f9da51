// ABOUTME: Route module organization for the Nutrilog HTTP API
// ABOUTME: Defines shared server resources and assembles the domain routers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! Route module for the Nutrilog server
//!
//! Each domain module holds route definitions and thin handlers that delegate
//! to the agent or the database managers.

/// Conversational meal logging
pub mod chat;
/// Confirmed meal entries
pub mod entries;
/// Health check routes
pub mod health;
/// Raw language model proxy
pub mod llm;

use std::sync::Arc;

use axum::Router;

pub use chat::ChatRoutes;
pub use entries::EntryRoutes;
pub use health::HealthRoutes;
pub use llm::LlmRoutes;

use crate::agent::MealAgent;
use crate::config::LlmSettings;
use crate::database::Database;

/// Everything request handlers need, shared behind an `Arc`
#[derive(Clone)]
pub struct ServerResources {
    /// Persistence
    pub database: Database,
    /// Pipeline bound to the configured provider
    pub agent: MealAgent,
    /// Settings used to build per-request providers
    pub llm_settings: LlmSettings,
}

impl ServerResources {
    /// Bundle resources for the router
    #[must_use]
    pub const fn new(database: Database, agent: MealAgent, llm_settings: LlmSettings) -> Self {
        Self {
            database,
            agent,
            llm_settings,
        }
    }
}

/// Assemble every route of the API
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(ChatRoutes::routes(Arc::clone(&resources)))
        .merge(EntryRoutes::routes(Arc::clone(&resources)))
        .merge(LlmRoutes::routes(resources))
}
