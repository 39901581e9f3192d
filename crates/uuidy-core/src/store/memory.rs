//! In-memory [`Store`] implementation for tests and embedding.
//!
//! Uses a `HashMap` behind `std::sync::RwLock`. The duplicate check and the
//! insert happen under one write lock, so concurrent inserts for the same
//! identifier produce exactly one winner.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Classification, ClassificationRecord};
use crate::{Error, Result};

use super::Store;

/// Process-local store. Contents are lost when it is dropped.
pub struct InMemoryStore {
    records: RwLock<HashMap<String, ClassificationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage(anyhow!("in-memory store lock poisoned"))
}

#[async_trait]
impl Store for InMemoryStore {
    async fn fetch(&self, identifier: &str) -> Result<Option<ClassificationRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .get(identifier)
            .map(|r| r.clone().with_cached(true)))
    }

    async fn insert(&self, draft: &Classification) -> Result<ClassificationRecord> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.contains_key(&draft.identifier) {
            return Err(Error::Duplicate(draft.identifier.clone()));
        }

        let now = Utc::now();
        let record = ClassificationRecord::new(draft.clone(), now, now, false);
        records.insert(draft.identifier.clone(), record.clone());
        Ok(record)
    }

    async fn contains(&self, identifier: &str) -> Result<bool> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.contains_key(identifier))
    }

    async fn ping(&self) -> Result<()> {
        self.records.read().map_err(poisoned)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{ClassificationType, ConfidenceLevel};

    const ID: &str = "6e400001-b5a3-f393-e0a9-e50e24dcca9e";

    fn draft(id: &str) -> Classification {
        Classification::new(
            id,
            "Nordic UART Service",
            ClassificationType::VendorSpecific,
            "Vendor-specific Nordic UART Service service",
            Vec::new(),
            ConfidenceLevel::Medium,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_then_fetch() {
        let store = InMemoryStore::new();
        let saved = store.insert(&draft(ID)).await.unwrap();
        assert!(!saved.cached);
        assert_eq!(saved.created_at, saved.updated_at);

        let fetched = store.fetch(ID).await.unwrap().unwrap();
        assert!(fetched.cached);
        assert_eq!(fetched.classification, saved.classification);
        assert!(store.contains(ID).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_record() {
        let store = InMemoryStore::new();
        assert!(store.fetch(ID).await.unwrap().is_none());
        assert!(!store.contains(ID).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let store = InMemoryStore::new();
        store.insert(&draft(ID)).await.unwrap();

        let err = store.insert(&draft(ID)).await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(ref id) if id == ID));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_have_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.insert(&draft(ID)).await }));
        }

        let mut ok = 0;
        let mut dup = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(Error::Duplicate(_)) => dup += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(dup, 7);
    }

    #[tokio::test]
    async fn test_ping() {
        InMemoryStore::new().ping().await.unwrap();
    }
}
