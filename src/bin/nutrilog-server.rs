// ABOUTME: Server binary for the Nutrilog meal-logging API
// ABOUTME: Loads configuration, wires the agent and database, and serves HTTP until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # Nutrilog Server Binary
//!
//! Starts the HTTP API with the language model provider and nutrition lookup
//! chosen by environment variables, optionally overridden on the command line.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nutrilog::{
    agent::MealAgent,
    config::{LlmProviderType, ServerConfig},
    database::Database,
    external::lookup_from_config,
    llm::{ChatProvider, LlmProvider},
    logging::LoggingConfig,
    middleware::setup_cors,
    routes::{router, ServerResources},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "nutrilog-server")]
#[command(about = "Nutrilog - conversational meal logging API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the language model provider (local, ollama, openai, anthropic)
    #[arg(long)]
    provider: Option<String>,

    /// Override the model name
    #[arg(long)]
    model: Option<String>,

    /// Override the database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    if args.provider.is_some() || args.model.is_some() {
        let provider = args
            .provider
            .as_deref()
            .map_or(config.llm.provider, LlmProviderType::from_str_or_default);
        config.llm = config.llm.with_provider(provider, args.model);
    }

    LoggingConfig::from_env().init()?;
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database ready at {}", config.database_url);

    let provider = ChatProvider::from_config(&config.llm)
        .context("Language model provider is not configured")?;
    match provider.health_check().await {
        Ok(true) => info!(provider = provider.name(), "Language model provider reachable"),
        Ok(false) | Err(_) => warn!(
            provider = provider.name(),
            "Language model provider did not answer the health check; chat turns may fail"
        ),
    }

    let lookup = lookup_from_config(&config.search)?;
    info!(lookup = lookup.name(), "Nutrition lookup ready");

    let agent = MealAgent::new(Arc::new(provider), lookup, config.agent);
    let resources = Arc::new(ServerResources::new(database, agent, config.llm.clone()));

    let app = router(resources)
        .layer(setup_cors(&config))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Nutrilog listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Nutrilog stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
