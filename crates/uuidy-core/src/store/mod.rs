//! Storage abstraction for classification records.
//!
//! The [`Store`] trait is the persistence seam behind the cache gateway.
//! Backends hold at most one record per canonical identifier and refuse to
//! overwrite an existing one: a second insert for the same identifier fails
//! with [`Error::Duplicate`](crate::Error::Duplicate).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Classification, ClassificationRecord};
use crate::Result;

/// Abstract storage backend for classifications.
///
/// Identifiers passed in are already canonical; stores compare them by
/// exact string equality.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`fetch`](Store::fetch) | Look up a stored record |
/// | [`insert`](Store::insert) | Persist a new record, stamping `created_at`/`updated_at` |
/// | [`contains`](Store::contains) | Existence check |
/// | [`ping`](Store::ping) | Trivial round-trip to prove the backend is reachable |
#[async_trait]
pub trait Store: Send + Sync {
    /// Retrieve the record for `identifier`, if any.
    ///
    /// The returned record has `cached = true`.
    async fn fetch(&self, identifier: &str) -> Result<Option<ClassificationRecord>>;

    /// Insert a new record built from `draft`.
    ///
    /// Fails with `Duplicate` when a record for the identifier already
    /// exists. The check and the write are atomic with respect to other
    /// inserts. The returned record has `cached = false`.
    async fn insert(&self, draft: &Classification) -> Result<ClassificationRecord>;

    async fn contains(&self, identifier: &str) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    async fn fetch(&self, identifier: &str) -> Result<Option<ClassificationRecord>> {
        (**self).fetch(identifier).await
    }

    async fn insert(&self, draft: &Classification) -> Result<ClassificationRecord> {
        (**self).insert(draft).await
    }

    async fn contains(&self, identifier: &str) -> Result<bool> {
        (**self).contains(identifier).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
