// ABOUTME: Stage-specific error types for the meal-logging pipeline
// ABOUTME: Connector, classification, extraction, and no-data failures as closed enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! Pipeline error taxonomy
//!
//! None of these cross [`MealAgent::process`](super::MealAgent::process); the
//! orchestrator turns them into user-facing text.

use thiserror::Error;

use crate::errors::AppError;

/// How a gateway call failed at the transport level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorErrorKind {
    /// The model backend could not be reached at all
    ConnectionRefused,
    /// The backend did not answer within the configured bound
    Timeout,
    /// Any other upstream failure (HTTP error, auth, malformed envelope)
    Transient,
}

/// Transport-level failure talking to the language model
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConnectorError {
    /// Failure classification
    pub kind: ConnectorErrorKind,
    /// Diagnostic message for logs
    pub message: String,
}

impl ConnectorError {
    /// Timeout raised by the agent's own deadline
    #[must_use]
    pub fn timeout(seconds: u64) -> Self {
        Self {
            kind: ConnectorErrorKind::Timeout,
            message: format!("language model did not respond within {seconds}s"),
        }
    }
}

impl From<AppError> for ConnectorError {
    fn from(error: AppError) -> Self {
        let kind = if error.is_connection_failure() {
            ConnectorErrorKind::ConnectionRefused
        } else if error.is_timeout() {
            ConnectorErrorKind::Timeout
        } else {
            ConnectorErrorKind::Transient
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// The model's classification output could not be used
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// Gateway call failed
    #[error("classification request failed: {0}")]
    Connector(#[from] ConnectorError),
    /// Output was not a JSON object after sanitization
    #[error("classification output is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

/// One food item could not be turned into an ingredient record
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Lookup backend failed
    #[error("nutrition lookup failed: {0}")]
    Lookup(#[source] AppError),
    /// Lookup returned nothing for the item
    #[error("no nutrition information found")]
    NoSnippets,
    /// Gateway call failed
    #[error("extraction request failed: {0}")]
    Connector(#[from] ConnectorError),
    /// Output was not the expected JSON shape
    #[error("extraction output is not a valid record: {0}")]
    Parse(#[source] serde_json::Error),
    /// A numeric field was negative or not finite
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Value as reported by the model
        value: f64,
    },
}

/// Synthesis was asked to aggregate zero records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no ingredient records to synthesize")]
pub struct NoDataError;
