// ABOUTME: SQLite persistence for confirmed meal entries and raw chat logs
// ABOUTME: Opens the pool, creates tables idempotently, and hands out managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! # Database Management
//!
//! Two append-only tables back the server:
//!
//! - `entries`: meals the user confirmed
//! - `chat_logs`: user/bot message pairs, written as fire-and-forget side effects

mod chat_logs;
mod entries;

pub use chat_logs::{ChatLogManager, ChatLogRecord};
pub use entries::MealEntryManager;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database handle shared by the HTTP layer
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool and create missing tables
    ///
    /// File databases are created on first use. In-memory URLs are limited to
    /// a single connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns a database error if the pool cannot be opened or a table
    /// cannot be created.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");
        let connection_options = if database_url.starts_with("sqlite:")
            && !in_memory
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {database_url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database_url, "Database ready");
        Ok(db)
    }

    /// Meal entry operations
    #[must_use]
    pub fn entries(&self) -> MealEntryManager {
        MealEntryManager::new(self.pool.clone())
    }

    /// Chat log operations
    #[must_use]
    pub fn chat_logs(&self) -> ChatLogManager {
        ChatLogManager::new(self.pool.clone())
    }

    /// Create tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns a database error if a statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                calories INTEGER NOT NULL,
                details TEXT NOT NULL DEFAULT '',
                protein REAL NOT NULL DEFAULT 0,
                carbs REAL NOT NULL DEFAULT 0,
                fat REAL NOT NULL DEFAULT 0,
                sugar REAL NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create entries table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_message TEXT,
                bot_response TEXT,
                timestamp TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create chat_logs table: {e}")))?;

        Ok(())
    }
}
