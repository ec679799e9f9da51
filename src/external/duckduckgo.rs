// ABOUTME: DuckDuckGo instant-answer client used as the default nutrition lookup
// ABOUTME: Converts the abstract and related topics of a query into text snippets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::NutritionLookup;
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "DuckDuckGo";

/// `DuckDuckGo` client configuration
#[derive(Debug, Clone)]
pub struct DuckDuckGoClientConfig {
    /// Instant-answer endpoint (default: <https://api.duckduckgo.com/>)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DuckDuckGoClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.duckduckgo.com/".to_owned(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// A related topic is either a single result or a named group of results
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result {
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Name", default)]
        name: String,
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
}

impl RelatedTopic {
    fn collect_into(&self, heading: &str, out: &mut Vec<String>) {
        match self {
            Self::Result { text } if !text.trim().is_empty() => {
                out.push(format!("Title: {heading}\nSnippet: {}", text.trim()));
            }
            Self::Result { .. } => {}
            Self::Group { name, topics } => {
                let title = if name.is_empty() { heading } else { name };
                for topic in topics {
                    topic.collect_into(title, out);
                }
            }
        }
    }
}

impl InstantAnswer {
    fn into_snippets(self, query: &str, limit: usize) -> Vec<String> {
        let heading = if self.heading.trim().is_empty() {
            query
        } else {
            self.heading.trim()
        };

        let mut snippets = Vec::new();
        if !self.abstract_text.trim().is_empty() {
            snippets.push(format!(
                "Title: {heading}\nSnippet: {}",
                self.abstract_text.trim()
            ));
        }
        for topic in &self.related_topics {
            topic.collect_into(heading, &mut snippets);
        }
        snippets.truncate(limit);
        snippets
    }
}

/// `DuckDuckGo` instant-answer search client
pub struct DuckDuckGoClient {
    config: DuckDuckGoClientConfig,
    http_client: reqwest::Client,
}

impl DuckDuckGoClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: DuckDuckGoClientConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl NutritionLookup for DuckDuckGoClient {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<String>> {
        let response = self
            .http_client
            .get(&self.config.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
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
            return Err(AppError::external_service(SERVICE, format!("HTTP {status}")));
        }

        // The endpoint answers with an empty body for some queries.
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let answer: InstantAnswer = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(SERVICE, format!("JSON parse error: {e}"))
        })?;
        let snippets = answer.into_snippets(query, limit);
        debug!(query, count = snippets.len(), "DuckDuckGo snippets");
        Ok(snippets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Heading": "Egg",
        "AbstractText": "A boiled egg has about 78 calories.",
        "RelatedTopics": [
            {"Text": "Egg white - 17 kcal per large egg", "FirstURL": "https://duckduckgo.com/Egg_white"},
            {"Name": "Cooking", "Topics": [
                {"Text": "Fried egg - 90 kcal", "FirstURL": "https://duckduckgo.com/Fried_egg"}
            ]},
            {"Text": "", "FirstURL": "https://duckduckgo.com/empty"}
        ]
    }"#;

    #[test]
    fn test_snippets_from_abstract_and_topics() {
        let answer: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        let snippets = answer.into_snippets("egg nutrition facts", 10);

        assert_eq!(
            snippets,
            vec![
                "Title: Egg\nSnippet: A boiled egg has about 78 calories.".to_owned(),
                "Title: Egg\nSnippet: Egg white - 17 kcal per large egg".to_owned(),
                "Title: Cooking\nSnippet: Fried egg - 90 kcal".to_owned(),
            ]
        );
    }

    #[test]
    fn test_snippets_capped_at_limit() {
        let answer: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(answer.into_snippets("egg", 1).len(), 1);
    }

    #[test]
    fn test_empty_answer_is_empty_list() {
        let answer: InstantAnswer = serde_json::from_str(r#"{"Heading": ""}"#).unwrap();
        assert!(answer.into_snippets("xyz", 3).is_empty());
    }
}
