// ABOUTME: Database operations for confirmed meal entries
// ABOUTME: Inserts entries, deriving calories from macros when absent, and lists them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::intelligence::calories_from_macros;
use crate::models::{MealEntry, NewMealEntry};

/// Meal entry database operations manager
pub struct MealEntryManager {
    pool: SqlitePool,
}

impl MealEntryManager {
    /// Create a new meal entry manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store an entry and return its id and stored calories
    ///
    /// Without explicit calories the value is computed from the macros;
    /// missing macros are stored as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn add_entry(&self, entry: &NewMealEntry) -> AppResult<(i64, u32)> {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Entry name cannot be empty"));
        }

        let calories = entry
            .calories
            .unwrap_or_else(|| calories_from_macros(entry.macronutrients()));
        if entry.calories.is_none() {
            debug!(calories, has_macros = entry.has_macros(), "Derived calories from macros");
        }

        let result = sqlx::query(
            r"
            INSERT INTO entries (name, calories, details, protein, carbs, fat, sugar)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(name)
        .bind(i64::from(calories))
        .bind(entry.details.as_deref().unwrap_or_default())
        .bind(entry.protein.unwrap_or(0.0))
        .bind(entry.carbs.unwrap_or(0.0))
        .bind(entry.fat.unwrap_or(0.0))
        .bind(entry.sugar.unwrap_or(0.0))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add entry: {e}")))?;

        Ok((result.last_insert_rowid(), calories))
    }

    /// List entries, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(&self) -> AppResult<Vec<MealEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, calories, details, protein, carbs, fat, sugar
            FROM entries
            ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list entries: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| MealEntry {
                id: r.get("id"),
                name: r.get("name"),
                calories: r.get("calories"),
                details: r.get("details"),
                protein: r.get("protein"),
                carbs: r.get("carbs"),
                fat: r.get("fat"),
                sugar: r.get("sugar"),
            })
            .collect())
    }
}
