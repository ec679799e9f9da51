// ABOUTME: Database operations for raw chat message logging
// ABOUTME: Best-effort writes that log failures instead of returning them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::errors::{AppError, AppResult};

/// One logged exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLogRecord {
    /// Row id
    pub id: i64,
    /// What the user said, if logged
    pub user_message: Option<String>,
    /// What the bot answered, if logged
    pub bot_response: Option<String>,
    /// When the row was created (RFC 3339)
    pub timestamp: String,
}

/// Chat log database operations manager
///
/// Logging is a side effect of chatting: the write methods never fail the
/// caller.
pub struct ChatLogManager {
    pool: SqlitePool,
}

impl ChatLogManager {
    /// Create a new chat log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a user message, returning the row id when the write succeeded
    pub async fn log_user_message(&self, message: &str) -> Option<i64> {
        let result = sqlx::query("INSERT INTO chat_logs (user_message, timestamp) VALUES ($1, $2)")
            .bind(message)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Some(done.last_insert_rowid()),
            Err(e) => {
                warn!(error = %e, "Failed to log user message");
                None
            }
        }
    }

    /// Attach the bot response to its user row, or insert a bot-only row
    pub async fn log_bot_response(&self, log_id: Option<i64>, response: &str) {
        let result = match log_id {
            Some(id) => {
                sqlx::query("UPDATE chat_logs SET bot_response = $1 WHERE id = $2")
                    .bind(response)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            None => {
                sqlx::query("INSERT INTO chat_logs (bot_response, timestamp) VALUES ($1, $2)")
                    .bind(response)
                    .bind(Utc::now().to_rfc3339())
                    .execute(&self.pool)
                    .await
            }
        };

        if let Err(e) = result {
            warn!(error = %e, ?log_id, "Failed to log bot response");
        }
    }

    /// Most recent exchanges, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn recent(&self, limit: u32) -> AppResult<Vec<ChatLogRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_message, bot_response, timestamp FROM chat_logs ORDER BY id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read chat logs: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| ChatLogRecord {
                id: r.get("id"),
                user_message: r.get("user_message"),
                bot_response: r.get("bot_response"),
                timestamp: r.get("timestamp"),
            })
            .collect())
    }
}
