//! Cache gateway over a [`Store`].
//!
//! Accepts raw identifiers, normalizes them, and delegates to the backend.
//! Reads are lenient: an identifier that cannot be normalized is simply a
//! miss. Writes are strict: a malformed identifier is an error.

use crate::identifier::normalize;
use crate::models::{Classification, ClassificationRecord};
use crate::store::Store;
use crate::Result;

pub struct ClassificationCache<S> {
    store: S,
}

impl<S: Store> ClassificationCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up a stored classification. Hits come back with `cached = true`.
    pub async fn get(&self, raw: &str) -> Result<Option<ClassificationRecord>> {
        let Ok(identifier) = normalize(raw) else {
            tracing::warn!(raw, "lookup with malformed identifier treated as miss");
            return Ok(None);
        };

        let record = self.store.fetch(&identifier).await?;
        match &record {
            Some(_) => tracing::info!(identifier = %identifier, "cache hit"),
            None => tracing::debug!(identifier = %identifier, "cache miss"),
        }
        Ok(record.map(|r| r.with_cached(true)))
    }

    /// Persist a fresh classification. Returns the record with
    /// `cached = false`, or `Duplicate` if one already exists.
    pub async fn save(&self, draft: &Classification) -> Result<ClassificationRecord> {
        let identifier = normalize(&draft.identifier)?;
        let record = if identifier == draft.identifier {
            self.store.insert(draft).await?
        } else {
            let mut canonical = draft.clone();
            canonical.identifier = identifier;
            self.store.insert(&canonical).await?
        };

        tracing::info!(
            identifier = %record.identifier(),
            kind = %record.classification.kind,
            "saved classification"
        );
        Ok(record.with_cached(false))
    }

    pub async fn exists(&self, raw: &str) -> Result<bool> {
        match normalize(raw) {
            Ok(identifier) => self.store.contains(&identifier).await,
            Err(_) => Ok(false),
        }
    }

    /// Round-trip to the backend.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
