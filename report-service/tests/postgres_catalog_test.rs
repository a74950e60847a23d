mod common;

use common::init_test_logging;
use equipment_report_service::database::PostgresCatalog;
use equipment_report_service::{DatasetCatalog, DatasetRecord};

/// Runs only when DATABASE_URL points at a reachable PostgreSQL instance.
#[tokio::test]
async fn test_postgres_catalog_round_trip() {
    init_test_logging();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL catalog test");
        return;
    };

    // Given: A migrated catalog
    let catalog = PostgresCatalog::new(&database_url)
        .await
        .expect("Failed to connect to catalog database");
    catalog.health_check().await.unwrap();

    // When: Adding a record
    let mut record = DatasetRecord::new("pg-test.csv".to_string(), 42);
    record.storage_path = format!("datasets/{}/pg-test.csv", record.id);
    catalog.add(&record).await.unwrap();

    // Then: It is listed among recent records
    let recent = catalog.list_recent(50).await.unwrap();
    let stored = recent
        .iter()
        .find(|r| r.id == record.id)
        .expect("record should be listed");
    assert_eq!(stored.filename, "pg-test.csv");
    assert_eq!(stored.size_bytes, 42);
    assert_eq!(stored.storage_path, record.storage_path);

    // And: Removing it reports that it existed
    assert!(catalog.remove(&record.id).await.unwrap());
    assert!(!catalog.remove(&record.id).await.unwrap());
}

#[tokio::test]
async fn test_postgres_catalog_breaks_timestamp_ties_by_insertion() {
    init_test_logging();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL catalog test");
        return;
    };

    let catalog = PostgresCatalog::new(&database_url)
        .await
        .expect("Failed to connect to catalog database");

    // Given: Two records sharing a timestamp later than any real upload
    let uploaded_at = chrono::Utc::now() + chrono::Duration::days(365 * 100);
    let mut first = DatasetRecord::new("tie-first.csv".to_string(), 1);
    first.uploaded_at = uploaded_at;
    let mut second = DatasetRecord::new("tie-second.csv".to_string(), 1);
    second.uploaded_at = uploaded_at;

    // When: They are inserted in order
    catalog.add(&first).await.unwrap();
    catalog.add(&second).await.unwrap();

    // Then: The later insertion comes first
    let recent = catalog.list_recent(2).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    catalog.remove(&first.id).await.unwrap();
    catalog.remove(&second.id).await.unwrap();
}
