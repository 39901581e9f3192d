//! Web search providers.
//!
//! Implements [`SearchProvider`] for the native binary:
//! - **[`SerpApiSearch`]** calls the SerpAPI Google engine with retry and backoff.
//! - **[`DisabledSearch`]** logs a warning and returns no results; used when
//!   search is turned off or no API key is available.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to build the provider named in the configuration:
//!
//! ```rust,no_run
//! # use uuidy::config::SearchConfig;
//! # use uuidy::search::create_provider;
//! let config = SearchConfig { provider: "disabled".into(), ..Default::default() };
//! let provider = create_provider(&config).unwrap();
//! assert_eq!(provider.name(), "disabled");
//! ```
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use uuidy_core::models::SearchResult;
use uuidy_core::search::{build_search_query, SearchProvider};

use crate::config::SearchConfig;

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

// ============ Disabled Provider ============

/// Provider that never searches.
pub struct DisabledSearch;

#[async_trait]
impl SearchProvider for DisabledSearch {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn query(&self, identifier: &str) -> Result<Vec<SearchResult>> {
        tracing::warn!(identifier, "web search is disabled, returning no results");
        Ok(Vec::new())
    }
}

// ============ SerpAPI Provider ============

/// Google results through SerpAPI.
pub struct SerpApiSearch {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    max_results: usize,
    max_retries: u32,
}

impl SerpApiSearch {
    pub fn new(config: &SearchConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: SERPAPI_ENDPOINT.to_string(),
            max_results: config.max_results,
            max_retries: config.max_retries,
        })
    }

    /// Point the client at a different base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    fn name(&self) -> &str {
        "serpapi"
    }

    async fn query(&self, identifier: &str) -> Result<Vec<SearchResult>> {
        let query = build_search_query(identifier);
        let num = self.max_results.to_string();
        let params = [
            ("engine", "google"),
            ("q", query.as_str()),
            ("api_key", self.api_key.as_str()),
            ("num", num.as_str()),
        ];

        tracing::info!(identifier, "searching SerpAPI");

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.get(&self.endpoint).query(&params).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        let results = parse_organic_results(&json, self.max_results);
                        tracing::info!(identifier, count = results.len(), "search complete");
                        return Ok(results);
                    }

                    // Rate limited or server error, retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        tracing::warn!(%status, attempt, "SerpAPI transient error");
                        last_err = Some(anyhow::anyhow!("SerpAPI error {}: {}", status, body_text));
                        continue;
                    }

                    // Client error (not 429), no retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("SerpAPI error {}: {}", status, body_text);
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "SerpAPI request failed");
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Search failed after retries")))
    }
}

/// Extract `organic_results` from a SerpAPI response.
///
/// Items without a title, link or positive position are skipped. The rest
/// are kept in response order, truncated to `max_results`.
pub fn parse_organic_results(json: &serde_json::Value, max_results: usize) -> Vec<SearchResult> {
    let Some(items) = json.get("organic_results").and_then(|r| r.as_array()) else {
        tracing::debug!("response has no organic_results");
        return Vec::new();
    };

    let mut results = Vec::with_capacity(items.len().min(max_results));
    for item in items {
        let title = item.get("title").and_then(|v| v.as_str()).unwrap_or_default();
        let link = item.get("link").and_then(|v| v.as_str()).unwrap_or_default();
        let position = item.get("position").and_then(|v| v.as_u64()).unwrap_or(0);

        if title.is_empty() || link.is_empty() || position < 1 {
            tracing::warn!(title, link, position, "skipping malformed search result");
            continue;
        }

        results.push(SearchResult {
            title: title.to_string(),
            url: link.to_string(),
            snippet: item
                .get("snippet")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            position: u32::try_from(position).unwrap_or(u32::MAX),
        });

        if results.len() == max_results {
            break;
        }
    }
    results
}

/// Create the [`SearchProvider`] named by `config.provider`.
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledSearch`] |
/// | `"serpapi"` | [`SerpApiSearch`], or [`DisabledSearch`] when the key variable is unset |
pub fn create_provider(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>> {
    if !config.is_enabled() {
        return Ok(Arc::new(DisabledSearch));
    }

    match config.provider.as_str() {
        "serpapi" => match std::env::var(&config.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(Arc::new(SerpApiSearch::new(config, key)?)),
            _ => {
                tracing::warn!(
                    env = %config.api_key_env,
                    "SerpAPI key not configured, web search disabled"
                );
                Ok(Arc::new(DisabledSearch))
            }
        },
        other => bail!("Unknown search provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_organic_results() {
        let body = json!({
            "search_metadata": { "status": "Success" },
            "organic_results": [
                {
                    "position": 1,
                    "title": "Heart Rate Service - Bluetooth SIG",
                    "link": "https://www.bluetooth.com/specifications/gatt/services/",
                    "snippet": "The Heart Rate Service exposes heart rate data."
                },
                {
                    "position": 2,
                    "title": "No snippet here",
                    "link": "https://example.com/hr"
                }
            ]
        });
        let results = parse_organic_results(&body, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].position, 1);
        assert_eq!(results[0].url, "https://www.bluetooth.com/specifications/gatt/services/");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_parse_skips_malformed_and_truncates() {
        let body = json!({
            "organic_results": [
                { "position": 1, "title": "", "link": "https://example.com/a" },
                { "position": 2, "title": "B", "link": "https://example.com/b" },
                { "position": 0, "title": "C", "link": "https://example.com/c" },
                { "position": 4, "title": "D" },
                { "position": 5, "title": "E", "link": "https://example.com/e" },
                { "position": 6, "title": "F", "link": "https://example.com/f" }
            ]
        });
        let results = parse_organic_results(&body, 2);
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "E"]);
    }

    #[test]
    fn test_parse_without_organic_results() {
        assert!(parse_organic_results(&json!({ "error": "Invalid API key." }), 10).is_empty());
    }

    #[test]
    fn test_create_disabled_provider() {
        let config = SearchConfig {
            provider: "disabled".into(),
            ..Default::default()
        };
        assert_eq!(create_provider(&config).unwrap().name(), "disabled");
    }

    #[test]
    fn test_missing_key_falls_back_to_disabled() {
        let config = SearchConfig {
            api_key_env: "UUIDY_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        assert_eq!(create_provider(&config).unwrap().name(), "disabled");
    }

    #[test]
    fn test_rejects_unknown_provider() {
        let config = SearchConfig {
            provider: "bing".into(),
            ..Default::default()
        };
        assert!(create_provider(&config).is_err());
    }

    #[tokio::test]
    async fn test_disabled_returns_nothing() {
        assert!(DisabledSearch.query("x").await.unwrap().is_empty());
    }
}
