// ABOUTME: Nutrition lookup abstraction and its search backends
// ABOUTME: Provides the NutritionLookup trait, query biasing, DuckDuckGo and USDA clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! External search clients
//!
//! A lookup turns a free-text food description into a few text snippets that
//! the extractor hands to the language model as context. An empty result is a
//! valid answer meaning nothing was found.

pub mod duckduckgo;
pub mod usda_client;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use duckduckgo::{DuckDuckGoClient, DuckDuckGoClientConfig};
pub use usda_client::{FoodNutrient, FoodSearchResult, UsdaClient, UsdaClientConfig};

use crate::config::{SearchBackend, SearchSettings};
use crate::errors::{AppError, AppResult};

/// Qualifier appended to queries that lack a nutrition keyword
const NUTRITION_QUALIFIER: &str = "nutrition facts";

/// Search backend returning text snippets about a food
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    /// Backend identifier used in logs
    fn name(&self) -> &'static str;

    /// Return at most `limit` snippets for `query`
    ///
    /// # Errors
    ///
    /// Returns an error only for transport or decoding failures; "nothing
    /// found" is `Ok(vec![])`.
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<String>>;
}

/// Bias a food description toward nutrition results
///
/// `"2 boiled eggs"` becomes `"2 boiled eggs nutrition facts"`; text already
/// mentioning nutrition is left alone.
#[must_use]
pub fn nutrition_query(item: &str) -> String {
    let item = item.trim();
    if item.to_lowercase().contains("nutrition") {
        item.to_owned()
    } else {
        format!("{item} {NUTRITION_QUALIFIER}")
    }
}

/// Look up snippets for one food item with the biased query
///
/// # Errors
///
/// Propagates the lookup's transport error.
pub async fn lookup_snippets(
    lookup: &dyn NutritionLookup,
    item: &str,
    limit: usize,
) -> AppResult<Vec<String>> {
    let query = nutrition_query(item);
    let mut snippets = lookup.search(&query, limit).await?;
    snippets.truncate(limit);
    Ok(snippets)
}

/// Build the configured lookup backend
///
/// # Errors
///
/// Returns `ErrorCode::ConfigMissing` when USDA is selected without an API key.
pub fn lookup_from_config(settings: &SearchSettings) -> AppResult<Arc<dyn NutritionLookup>> {
    let lookup: Arc<dyn NutritionLookup> = match settings.backend {
        SearchBackend::DuckDuckGo => Arc::new(DuckDuckGoClient::new(
            DuckDuckGoClientConfig::default(),
        )?),
        SearchBackend::Usda => {
            let api_key = settings
                .usda_api_key
                .clone()
                .ok_or_else(|| AppError::config_missing("USDA_API_KEY"))?;
            Arc::new(UsdaClient::new(UsdaClientConfig {
                api_key,
                cache_ttl_secs: settings.cache_ttl.as_secs(),
                ..UsdaClientConfig::default()
            })?)
        }
    };
    info!(backend = lookup.name(), "Nutrition lookup ready");
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_gets_qualifier() {
        assert_eq!(nutrition_query("2 boiled eggs"), "2 boiled eggs nutrition facts");
        assert_eq!(nutrition_query("  toast "), "toast nutrition facts");
    }

    #[test]
    fn test_query_with_keyword_unchanged() {
        assert_eq!(nutrition_query("banana Nutrition"), "banana Nutrition");
        assert_eq!(
            nutrition_query("oat milk nutritional value"),
            "oat milk nutritional value"
        );
    }

    #[test]
    fn test_usda_without_key_fails_fast() {
        let settings = SearchSettings {
            backend: SearchBackend::Usda,
            ..SearchSettings::default()
        };
        let err = lookup_from_config(&settings).err().unwrap();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigMissing);
    }
}
