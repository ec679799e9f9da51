// ABOUTME: USDA FoodData Central search client used as a nutrition lookup backend
// ABOUTME: Renders search hits as text snippets and caches them with a TTL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! USDA `FoodData` Central API Client
//!
//! Each food returned by `foods/search` is rendered as one snippet naming the
//! food, its data type, and the energy and macronutrient values per 100 g.
//! Results are cached per `(query, limit)` so that repeated items within a
//! session do not hit the API again.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>
//!
//! # Example
//! ```rust,no_run
//! use nutrilog::external::{NutritionLookup, UsdaClient, UsdaClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = UsdaClient::new(UsdaClientConfig {
//!     api_key: "your_api_key".to_owned(),
//!     ..UsdaClientConfig::default()
//! })?;
//! let snippets = client.search("apple nutrition facts", 3).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::NutritionLookup;
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "USDA API";

/// Nutrients rendered into snippets, by USDA nutrient name
const SNIPPET_NUTRIENTS: [&str; 5] = [
    "Energy",
    "Protein",
    "Carbohydrate, by difference",
    "Total lipid (fat)",
    "Total Sugars",
];

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Cache TTL in seconds (default: 86400 = 24 hours)
    pub cache_ttl_secs: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.nal.usda.gov/fdc/v1".to_owned(),
            cache_ttl_secs: 86_400,
            timeout_secs: 15,
        }
    }
}

/// One nutrient value in a search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    /// Nutrient name (e.g., "Protein", "Energy")
    pub nutrient_name: String,
    /// Nutrient unit (e.g., "G", "KCAL")
    #[serde(default)]
    pub unit_name: String,
    /// Amount per 100 g
    #[serde(default)]
    pub value: f64,
}

/// USDA Food Search Result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchResult {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type (e.g., "Survey (FNDDS)", "Foundation", "SR Legacy")
    #[serde(default)]
    pub data_type: String,
    /// Brand owner (for branded foods)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    /// Nutrients reported for this food
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

impl FoodSearchResult {
    /// Render as a snippet for the extraction prompt
    #[must_use]
    pub fn to_snippet(&self) -> String {
        let mut snippet = format!("Title: {}", self.description);
        if let Some(brand) = &self.brand_owner {
            let _ = write!(snippet, " ({brand})");
        }
        let _ = write!(snippet, "\nSnippet: {} data, per 100 g:", self.data_type);
        for name in SNIPPET_NUTRIENTS {
            if let Some(nutrient) = self.food_nutrients.iter().find(|n| n.nutrient_name == name) {
                let _ = write!(
                    snippet,
                    " {} {} {};",
                    nutrient.nutrient_name,
                    nutrient.value,
                    nutrient.unit_name.to_lowercase()
                );
            }
        }
        snippet
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodSearchResult>,
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Store `data` under `key`, dropping every entry that has already expired
fn cache_insert<T>(
    cache: &mut HashMap<String, CacheEntry<T>>,
    key: String,
    data: T,
    now: Instant,
    ttl: Duration,
) {
    cache.retain(|_, entry| now < entry.expires_at);
    cache.insert(
        key,
        CacheEntry {
            data,
            expires_at: now + ttl,
        },
    );
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<Vec<String>>>>>,
}

impl UsdaClient {
    /// Create a new USDA API client
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigMissing` when the API key is empty, or an
    /// internal error if the HTTP client cannot be built.
    pub fn new(config: UsdaClientConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::config_missing("USDA_API_KEY"));
        }
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
            search_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Search for foods by query string
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the body cannot be decoded.
    pub async fn search_foods(
        &self,
        query: &str,
        page_size: usize,
    ) -> AppResult<Vec<FoodSearchResult>> {
        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        let url = format!("{}/foods/search", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageSize", &page_size.clamp(1, 200).to_string()),
                ("api_key", &self.config.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::external_timeout(SERVICE, self.config.timeout_secs)
                } else if e.is_connect() {
                    AppError::external_unavailable(SERVICE, e.to_string())
                } else {
                    AppError::external_service(SERVICE, e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(
                SERVICE,
                format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
            ));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("JSON parse error: {e}"))
        })?;

        Ok(search_response.foods)
    }
}

#[async_trait]
impl NutritionLookup for UsdaClient {
    fn name(&self) -> &'static str {
        "usda"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<String>> {
        let cache_key = format!("{query}:{limit}");
        {
            let cache = self.search_cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if Instant::now() < entry.expires_at {
                    debug!(query, "USDA cache hit");
                    return Ok(entry.data.clone());
                }
            }
        }

        let snippets: Vec<String> = self
            .search_foods(query, limit)
            .await?
            .iter()
            .take(limit)
            .map(FoodSearchResult::to_snippet)
            .collect();

        if snippets.is_empty() {
            warn!(query, "USDA search returned no foods");
        }

        cache_insert(
            &mut *self.search_cache.write().await,
            cache_key,
            snippets.clone(),
            Instant::now(),
            Duration::from_secs(self.config.cache_ttl_secs),
        );

        Ok(snippets)
    }
}
