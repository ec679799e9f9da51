// ABOUTME: Meal entry route handlers for storing and listing confirmed meals
// ABOUTME: Thin wrappers over the meal entry manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::ServerResources;
use crate::errors::AppResult;
use crate::models::{MealEntry, NewMealEntry};

/// Response to a stored entry
#[derive(Debug, Serialize)]
pub struct EntryCreatedResponse {
    /// Row id
    pub id: i64,
    /// Calories as stored (given or derived)
    pub calories: u32,
}

/// Entry routes implementation
pub struct EntryRoutes;

impl EntryRoutes {
    /// Create entry routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/entries",
                get(Self::handle_list).post(Self::handle_create),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(entry): Json<NewMealEntry>,
    ) -> AppResult<(StatusCode, Json<EntryCreatedResponse>)> {
        let (id, calories) = resources.database.entries().add_entry(&entry).await?;
        Ok((StatusCode::CREATED, Json(EntryCreatedResponse { id, calories })))
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<Vec<MealEntry>>> {
        Ok(Json(resources.database.entries().list_entries().await?))
    }
}
