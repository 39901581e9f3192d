//! One-shot classification from the command line.

use anyhow::Result;

use uuidy_core::models::ClassificationRecord;
use uuidy_core::resolve::Resolver;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::search::create_provider;
use crate::sqlite_store::SqliteStore;

/// Run the full cache → search → classify → save pipeline once.
pub async fn classify(config: &Config, uuid: &str) -> Result<ClassificationRecord> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;

    let store = SqliteStore::new(pool.clone());
    let search = create_provider(&config.search)?;
    let resolver = Resolver::new(store, search);

    let record = resolver.resolve(uuid).await;
    pool.close().await;
    Ok(record?)
}

/// CLI entry point. Prints the record as pretty JSON on stdout.
pub async fn run_classify(config: &Config, uuid: &str) -> Result<()> {
    let record = classify(config, uuid).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
