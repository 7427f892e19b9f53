//! Migration integration tests.

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use segmenta::interfaces::{CrmStore, StorageError};
use segmenta::model::{RfmRecord, Segment};
use segmenta::storage::migrate::MIGRATIONS;
use segmenta::storage::sqlite::SqliteCrmStore;

use crate::common::test_store;

async fn fresh_store() -> SqliteCrmStore {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    SqliteCrmStore::new(pool)
}

#[tokio::test]
async fn test_migrate_applies_all_versions() {
    let store = fresh_store().await;
    let applied = store.migrate().await.unwrap();
    assert_eq!(applied, MIGRATIONS.len());
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let store = fresh_store().await;
    store.migrate().await.unwrap();
    assert_eq!(store.migrate().await.unwrap(), 0);
    assert_eq!(store.migrate().await.unwrap(), 0);
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let store = test_store().await;

    // No customer 999 exists; the rfm foreign key must reject this.
    let err = store
        .replace_rfm(&[RfmRecord {
            customer_id: 999,
            recency: 1,
            frequency: 1,
            monetary: 10.0,
            r_score: 5,
            f_score: 5,
            m_score: 5,
            segment: Segment::Champion,
        }])
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Integrity { .. }));
}

#[tokio::test]
async fn test_tables_are_queryable_after_migrate() {
    let store = test_store().await;

    for table in [
        "customers",
        "items",
        "transactions",
        "rfm",
        "marketing_campaigns",
        "campaign_emails",
        "social_media_campaigns",
        "social_media_posts",
        "campaign_audience",
    ] {
        let result = store
            .select_table(&format!("SELECT COUNT(*) AS n FROM {table}"))
            .await
            .unwrap();
        assert_eq!(result.rows.len(), 1, "table {table} should be queryable");
    }
}

#[tokio::test]
async fn test_init_storage_surfaces_directory_errors_as_io() {
    use segmenta::config::StorageConfig;
    use segmenta::storage::init_storage;

    // The database path nests under a regular file, so creating the
    // parent directory must fail with an I/O error.
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let config = StorageConfig {
        storage_type: "sqlite".to_string(),
        url: format!("{}/sub/crm.db", blocker.display()),
    };

    let err = init_storage(&config).await.unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
}

#[tokio::test]
async fn test_store_is_usable_through_trait_object() {
    let store: Arc<dyn CrmStore> = test_store().await;
    assert!(store.customer(1).await.unwrap().is_none());
}
