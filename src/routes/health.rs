// ABOUTME: Health check route handlers for liveness probes
// ABOUTME: Serves a static ok status on the root and /health paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health check routes
    pub fn routes() -> Router {
        Router::new()
            .route("/", get(Self::handle_health))
            .route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({ "status": "ok" }))
    }
}
