//! Orchestration: cache, then search, then classify, then store.
//!
//! [`Resolver::resolve`] is the single entry point the HTTP server and the
//! CLI call. A cache hit returns immediately and never touches the search
//! provider. A miss always ends in a stored record, even when search fails.

use std::time::Instant;

use crate::cache::ClassificationCache;
use crate::classify::Classifier;
use crate::identifier::normalize;
use crate::models::ClassificationRecord;
use crate::search::SearchProvider;
use crate::store::Store;
use crate::Result;

pub struct Resolver<S, P> {
    cache: ClassificationCache<S>,
    search: P,
    classifier: Classifier<'static>,
}

impl<S: Store, P: SearchProvider> Resolver<S, P> {
    pub fn new(store: S, search: P) -> Self {
        Self::with_classifier(store, search, Classifier::default())
    }

    pub fn with_classifier(store: S, search: P, classifier: Classifier<'static>) -> Self {
        Self {
            cache: ClassificationCache::new(store),
            search,
            classifier,
        }
    }

    pub fn cache(&self) -> &ClassificationCache<S> {
        &self.cache
    }

    /// Classify `raw`, consulting the cache first.
    ///
    /// Fails with `InvalidFormat` before any I/O if `raw` is malformed.
    /// Search errors are logged and treated as zero results. A concurrent
    /// save of the same identifier surfaces as `Duplicate`.
    pub async fn resolve(&self, raw: &str) -> Result<ClassificationRecord> {
        let started = Instant::now();
        let identifier = normalize(raw)?;

        if let Some(record) = self.cache.get(&identifier).await? {
            tracing::info!(
                identifier = %identifier,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "served from cache"
            );
            return Ok(record);
        }

        let results = match self.search.query(&identifier).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(
                    identifier = %identifier,
                    provider = self.search.name(),
                    error = %e,
                    "search failed, classifying without results"
                );
                Vec::new()
            }
        };

        let draft = self.classifier.classify(&identifier, &results);
        let record = self.cache.save(&draft).await?;

        tracing::info!(
            identifier = %identifier,
            kind = %record.classification.kind,
            confidence = %record.classification.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "classified"
        );
        Ok(record)
    }
}
