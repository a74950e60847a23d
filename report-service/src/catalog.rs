use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ReportError;

/// One stored upload: where its bytes live and when it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub uuid: Uuid,
    pub filename: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl DatasetRecord {
    pub fn new(filename: String, size_bytes: i64) -> Self {
        let uuid = Uuid::new_v4();
        Self {
            id: format!("ds_{}", uuid.simple()),
            uuid,
            filename,
            storage_path: String::new(),
            size_bytes,
            uploaded_at: Utc::now(),
        }
    }
}

/// Append-only record of uploads, queried by recency.
#[async_trait]
pub trait DatasetCatalog: Send + Sync {
    async fn add(&self, record: &DatasetRecord) -> Result<(), ReportError>;

    /// Remove a record. Returns whether it existed.
    async fn remove(&self, dataset_id: &str) -> Result<bool, ReportError>;

    /// Up to `limit` records, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<DatasetRecord>, ReportError>;

    async fn latest(&self) -> Result<Option<DatasetRecord>, ReportError> {
        Ok(self.list_recent(1).await?.into_iter().next())
    }

    async fn health_check(&self) -> Result<(), ReportError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    records: RwLock<Vec<DatasetRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatasetCatalog for InMemoryCatalog {
    async fn add(&self, record: &DatasetRecord) -> Result<(), ReportError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn remove(&self, dataset_id: &str) -> Result<bool, ReportError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != dataset_id);
        Ok(records.len() != before)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<DatasetRecord>, ReportError> {
        let records = self.records.read().await;
        let mut ordered: Vec<(usize, &DatasetRecord)> = records.iter().enumerate().collect();
        // Newest first; later insertion wins on equal timestamps.
        ordered.sort_by(|(ia, a), (ib, b)| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| ib.cmp(ia))
        });
        Ok(ordered
            .into_iter()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect())
    }
}
