// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment configs, provider selection, and agent limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! Configuration module for the Nutrilog server
//!
//! - **Environment**: Server configuration from environment variables
//! - **Types**: Provider and search backend selectors

/// Environment and server configuration
pub mod environment;
/// Provider and backend selector enums
pub mod types;

pub use environment::{AgentConfig, LlmSettings, SearchSettings, ServerConfig};
pub use types::{LlmProviderType, SearchBackend};
