//! Search provider abstraction.
//!
//! A [`SearchProvider`] turns a canonical identifier into ranked web
//! results. Concrete HTTP clients live in the native crate; the core only
//! knows the trait and how to phrase the query.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SearchResult;

/// Source of web search results for an identifier.
///
/// Errors are advisory: the resolver logs them and classifies from an
/// empty result list.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in logs (e.g. `"serpapi"`).
    fn name(&self) -> &str;

    async fn query(&self, identifier: &str) -> Result<Vec<SearchResult>>;
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn query(&self, identifier: &str) -> Result<Vec<SearchResult>> {
        (**self).query(identifier).await
    }
}

/// Query text sent to the search engine: the quoted identifier plus
/// Bluetooth keywords to bias ranking.
pub fn build_search_query(identifier: &str) -> String {
    format!(
        "\"{}\" bluetooth OR BLE OR service OR GATT OR beacon",
        identifier
    )
}

/// Provider that always answers with a fixed result list. Useful for
/// offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSearch {
    results: Vec<SearchResult>,
}

impl StaticSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    fn name(&self) -> &str {
        "static"
    }

    async fn query(&self, _identifier: &str) -> Result<Vec<SearchResult>> {
        Ok(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_quotes_identifier() {
        assert_eq!(
            build_search_query("0000180d-0000-1000-8000-00805f9b34fb"),
            "\"0000180d-0000-1000-8000-00805f9b34fb\" bluetooth OR BLE OR service OR GATT OR beacon"
        );
    }

    #[tokio::test]
    async fn test_arc_dyn_provider_delegates() {
        let provider: Arc<dyn SearchProvider> = Arc::new(StaticSearch::default());
        assert_eq!(provider.name(), "static");
        assert!(provider.query("x").await.unwrap().is_empty());
    }
}
