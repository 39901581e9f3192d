//! SQLite-backed [`Store`] implementation.
//!
//! One row per canonical identifier in `uuid_classifications`. Sources are
//! kept as a JSON array in `sources_json`; timestamps are Unix seconds.
//! Inserts are plain `INSERT`s, so the primary key arbitrates concurrent
//! saves and the loser gets [`Error::Duplicate`].

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use uuidy_core::models::{Classification, ClassificationRecord, SourceInfo};
use uuidy_core::store::Store;
use uuidy_core::{Error, Result};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn from_ts(ts: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).with_context(|| format!("timestamp out of range: {}", ts))
}

fn row_to_record(row: &SqliteRow) -> anyhow::Result<ClassificationRecord> {
    let kind: String = row.try_get("type")?;
    let confidence: String = row.try_get("confidence")?;
    let sources_json: String = row.try_get("sources_json")?;
    let sources: Vec<SourceInfo> =
        serde_json::from_str(&sources_json).context("invalid sources_json")?;

    let classification = Classification::new(
        row.try_get::<String, _>("uuid")?,
        row.try_get::<String, _>("name")?,
        kind.parse()?,
        row.try_get::<String, _>("description")?,
        sources,
        confidence.parse()?,
        from_ts(row.try_get("searched_at")?)?,
    );

    Ok(ClassificationRecord::new(
        classification,
        from_ts(row.try_get("created_at")?)?,
        from_ts(row.try_get("updated_at")?)?,
        true,
    ))
}

#[async_trait]
impl Store for SqliteStore {
    async fn fetch(&self, identifier: &str) -> Result<Option<ClassificationRecord>> {
        let row = sqlx::query(
            r#"
            SELECT uuid, name, type, description, sources_json, confidence,
                   searched_at, created_at, updated_at
            FROM uuid_classifications
            WHERE uuid = ?
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, draft: &Classification) -> Result<ClassificationRecord> {
        let sources_json =
            serde_json::to_string(&draft.sources).context("failed to encode sources")?;
        let searched_at = draft.searched_at.timestamp();
        let now = Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO uuid_classifications (uuid, name, type, description, sources_json,
                                              confidence, searched_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.identifier)
        .bind(&draft.name)
        .bind(draft.kind.as_str())
        .bind(&draft.description)
        .bind(&sources_json)
        .bind(draft.confidence.as_str())
        .bind(searched_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(Error::Duplicate(draft.identifier.clone()));
            }
            Err(e) => return Err(anyhow::Error::from(e).into()),
        }

        let mut stored = draft.clone();
        stored.searched_at = from_ts(searched_at)?;
        let created = from_ts(now)?;
        Ok(ClassificationRecord::new(stored, created, created, false))
    }

    async fn contains(&self, identifier: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT COUNT(*) > 0 FROM uuid_classifications WHERE uuid = ?")
                .bind(identifier)
                .fetch_one(&self.pool)
                .await
                .map_err(anyhow::Error::from)?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(())
    }
}
