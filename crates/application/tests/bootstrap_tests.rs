//! End-to-end bootstrap runs against an in-memory SQLite store

use application::Bootstrapper;
use chrono::{TimeZone, Utc};
use domain::{CollectionSpec, ReadingStore, SeedPolicy, WallId};
use infrastructure::SqliteReadingStore;
use std::sync::Arc;

async fn create_store() -> Arc<SqliteReadingStore> {
    Arc::new(
        SqliteReadingStore::open(":memory:", "cragcrowd")
            .await
            .expect("Failed to open in-memory database"),
    )
}

fn bootstrapper(store: &Arc<SqliteReadingStore>, policy: SeedPolicy) -> Bootstrapper {
    Bootstrapper::new(store.clone(), CollectionSpec::default(), policy)
}

fn now() -> chrono::DateTime<Utc> {
    Utc.timestamp_millis_opt(1_760_600_000_000).unwrap()
}

#[tokio::test]
async fn test_first_run_creates_schema_and_seed() {
    let store = create_store().await;

    let report = bootstrapper(&store, SeedPolicy::Always)
        .run(now())
        .await
        .unwrap();

    assert_eq!(report.database, "cragcrowd");
    assert_eq!(report.collection, "sensor_readings");
    assert!(report.schema.collection_created);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.total_documents, 3);
    assert_eq!(
        store.list_indexes("sensor_readings").await.unwrap(),
        vec![
            "wall_id_1",
            "server_timestamp_-1",
            "wall_id_1_server_timestamp_-1",
            "created_at_-1",
        ]
    );
}

#[tokio::test]
async fn test_seeded_documents_per_wall() {
    let store = create_store().await;
    bootstrapper(&store, SeedPolicy::Always)
        .run(now())
        .await
        .unwrap();

    let test_wall = WallId::new("test_wall").unwrap();
    let lower_town_wall = WallId::new("lower_town_wall").unwrap();

    assert_eq!(
        store.count_by_wall("sensor_readings", &test_wall).await.unwrap(),
        2
    );
    assert_eq!(
        store
            .count_by_wall("sensor_readings", &lower_town_wall)
            .await
            .unwrap(),
        1
    );

    let readings = store
        .find_by_wall("sensor_readings", &test_wall)
        .await
        .unwrap();
    assert_eq!(readings[0].timestamp - readings[1].timestamp, 600_000);
    assert_eq!(readings[0].device_count, 5);
    assert_eq!(readings[1].device_count, 8);
    assert_eq!(readings[0].server_timestamp, now());
    assert_eq!(readings[1].created_at.timestamp_millis(), 1_760_599_400_000);
}

#[tokio::test]
async fn test_second_run_always_duplicates_documents_not_indexes() {
    let store = create_store().await;
    let bootstrapper = bootstrapper(&store, SeedPolicy::Always);

    bootstrapper.run(now()).await.unwrap();
    let report = bootstrapper.run(now()).await.unwrap();

    assert!(!report.schema.collection_created);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.total_documents, 6);
    assert_eq!(store.list_indexes("sensor_readings").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_second_run_if_empty_keeps_three_documents() {
    let store = create_store().await;
    let bootstrapper = bootstrapper(&store, SeedPolicy::IfEmpty);

    let first = bootstrapper.run(now()).await.unwrap();
    let second = bootstrapper.run(now()).await.unwrap();

    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.total_documents, 3);
}

#[tokio::test]
async fn test_skip_policy_creates_schema_only() {
    let store = create_store().await;

    let report = bootstrapper(&store, SeedPolicy::Skip)
        .run(now())
        .await
        .unwrap();

    assert_eq!(report.schema.indexes.len(), 4);
    assert_eq!(report.inserted, 0);
    assert_eq!(report.total_documents, 0);
}
