use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use uuidy::config::parse_config;
use uuidy::sqlite_store::SqliteStore;
use uuidy::{db, migrate};
use uuidy_core::models::{Classification, ClassificationType, ConfidenceLevel, SourceInfo};
use uuidy_core::store::Store;
use uuidy_core::Error;

const NUS: &str = "6e400001-b5a3-f393-e0a9-e50e24dcca9e";

async fn open_store(dir: &Path) -> SqliteStore {
    let config = parse_config(&format!(
        "[db]\npath = \"{}/nested/uuidy.sqlite\"\n",
        dir.display()
    ))
    .unwrap();
    let pool = db::connect(&config).await.unwrap();
    migrate::apply(&pool).await.unwrap();
    SqliteStore::new(pool)
}

fn draft(id: &str) -> Classification {
    Classification::new(
        id,
        "Nordic UART Service",
        ClassificationType::VendorSpecific,
        "Vendor-specific Nordic UART Service service",
        vec![
            SourceInfo {
                title: "Nordic UART Service (NUS) - Nordic Semiconductor".into(),
                url: "https://developer.nordicsemi.com/nus.html".into(),
                snippet: "Serial port emulation over BLE.".into(),
            },
            SourceInfo {
                title: "BLE UART Service Tutorial".into(),
                url: "https://learn.adafruit.com/uart-service".into(),
                snippet: "No snippet available".into(),
            },
        ],
        ConfidenceLevel::Medium,
        Utc::now(),
    )
}

#[tokio::test]
async fn test_insert_and_fetch_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(tmp.path()).await;

    let saved = store.insert(&draft(NUS)).await.unwrap();
    assert!(!saved.cached);

    let fetched = store.fetch(NUS).await.unwrap().unwrap();
    assert!(fetched.cached);
    assert_eq!(fetched.classification, saved.classification);
    assert_eq!(fetched.created_at, saved.created_at);
    assert_eq!(fetched.classification.sources.len(), 2);
    assert_eq!(
        fetched.classification.sources[0].url,
        "https://developer.nordicsemi.com/nus.html"
    );
}

#[tokio::test]
async fn test_fetch_missing_returns_none() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(tmp.path()).await;

    assert!(store.fetch(NUS).await.unwrap().is_none());
    assert!(!store.contains(NUS).await.unwrap());
    store.ping().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_insert_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(tmp.path()).await;

    store.insert(&draft(NUS)).await.unwrap();
    let err = store.insert(&draft(NUS)).await.unwrap_err();
    assert!(matches!(err, Error::Duplicate(ref id) if id == NUS));
    assert!(store.contains(NUS).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_inserts_have_one_winner() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(open_store(tmp.path()).await);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move { store.insert(&draft(NUS)).await }));
    }

    let mut ok = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => ok += 1,
            Err(Error::Duplicate(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, 1);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uuid_classifications")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_unknown_rows_are_corrected_on_read() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(tmp.path()).await;

    let id = "12345678-1234-1234-1234-123456789abc";
    sqlx::query(
        "INSERT INTO uuid_classifications \
         (uuid, name, type, description, sources_json, confidence, searched_at, created_at, updated_at) \
         VALUES (?, 'Unknown', 'Unknown', 'legacy row', '[]', 'high', 0, 0, 0)",
    )
    .bind(id)
    .execute(store.pool())
    .await
    .unwrap();

    let record = store.fetch(id).await.unwrap().unwrap();
    assert_eq!(record.classification.confidence, ConfidenceLevel::Low);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(tmp.path()).await;
    migrate::apply(store.pool()).await.unwrap();
    migrate::apply(store.pool()).await.unwrap();
}
