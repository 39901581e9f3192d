//! Cache lookup by identifier.
//!
//! Reads a stored classification without searching or classifying. Used by
//! the `uuidy get` command.

use anyhow::{bail, Result};

use uuidy_core::cache::ClassificationCache;
use uuidy_core::models::ClassificationRecord;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Fetch a stored record. Fails if the identifier has never been classified.
pub async fn get_classification(config: &Config, uuid: &str) -> Result<ClassificationRecord> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;

    let cache = ClassificationCache::new(SqliteStore::new(pool.clone()));
    let record = cache.get(uuid).await?;
    pool.close().await;

    match record {
        Some(record) => Ok(record),
        None => bail!("no classification stored for: {}", uuid),
    }
}

/// CLI entry point. Prints the record as pretty JSON on stdout.
pub async fn run_get(config: &Config, uuid: &str) -> Result<()> {
    let record = get_classification(config, uuid).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
