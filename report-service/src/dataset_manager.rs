use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::catalog::{DatasetCatalog, DatasetRecord, InMemoryCatalog};
use crate::config::ServiceConfig;
use crate::database::PostgresCatalog;
use crate::error::ReportError;
use crate::storage::{sanitize_filename, DatasetStorage};

/// Storage gateway: uploaded bytes in the blob store, records in the catalog.
pub struct DatasetManager {
    storage: DatasetStorage,
    catalog: Arc<dyn DatasetCatalog>,
}

impl DatasetManager {
    pub fn new(storage: DatasetStorage, catalog: Arc<dyn DatasetCatalog>) -> Self {
        Self { storage, catalog }
    }

    pub fn in_memory() -> Self {
        Self::new(DatasetStorage::in_memory(), Arc::new(InMemoryCatalog::new()))
    }

    pub async fn from_config(config: &ServiceConfig) -> Result<Self, ReportError> {
        let storage = DatasetStorage::from_url(&config.storage_url)?;

        let catalog: Arc<dyn DatasetCatalog> = match &config.database_url {
            Some(database_url) => Arc::new(PostgresCatalog::new(database_url).await?),
            None => {
                warn!("DATABASE_URL not set, upload catalog is kept in memory only");
                Arc::new(InMemoryCatalog::new())
            }
        };

        Ok(Self::new(storage, catalog))
    }

    pub fn storage(&self) -> &DatasetStorage {
        &self.storage
    }

    pub fn catalog(&self) -> &Arc<dyn DatasetCatalog> {
        &self.catalog
    }

    /// Persist the upload bytes and register the record.
    ///
    /// If the catalog insert fails the stored blob is removed again.
    pub async fn store_upload(
        &self,
        filename: &str,
        content: Bytes,
    ) -> Result<DatasetRecord, ReportError> {
        let mut record = DatasetRecord::new(sanitize_filename(filename), content.len() as i64);

        record.storage_path = self
            .storage
            .put(&record.id, &record.filename, content)
            .await?;

        if let Err(e) = self.catalog.add(&record).await {
            error!("Failed to register dataset {}: {}", record.id, e);
            if let Err(cleanup) = self.storage.delete(&record.storage_path).await {
                warn!(
                    "Failed to remove orphaned upload {}: {}",
                    record.storage_path, cleanup
                );
            }
            return Err(e);
        }

        info!(
            "Stored dataset {} ({}, {} bytes)",
            record.id, record.filename, record.size_bytes
        );
        Ok(record)
    }

    pub async fn load_content(&self, record: &DatasetRecord) -> Result<Bytes, ReportError> {
        self.storage.get(&record.storage_path).await
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<DatasetRecord>, ReportError> {
        self.catalog.list_recent(limit).await
    }

    pub async fn latest(&self) -> Result<Option<DatasetRecord>, ReportError> {
        self.catalog.latest().await
    }

    pub async fn health_check(&self) -> Result<(), ReportError> {
        self.catalog.health_check().await
    }
}
