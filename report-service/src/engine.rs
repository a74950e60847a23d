use bytes::Bytes;
use futures::future::join_all;
use tracing::{info, warn};

use crate::catalog::DatasetRecord;
use crate::config::{ServiceConfig, DEFAULT_RECENT_LIMIT};
use crate::dataset_manager::DatasetManager;
use crate::domain::{RecentSummary, ReportDocument, SummaryResult};
use crate::error::ReportError;
use crate::report::render_report;
use crate::summary::summarize_csv;

pub struct ReportEngine {
    dataset_manager: DatasetManager,
    recent_limit: usize,
}

impl ReportEngine {
    pub fn new(dataset_manager: DatasetManager, recent_limit: usize) -> Self {
        Self {
            dataset_manager,
            recent_limit: recent_limit.max(1),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(DatasetManager::in_memory(), DEFAULT_RECENT_LIMIT)
    }

    pub async fn from_config(config: &ServiceConfig) -> Result<Self, ReportError> {
        info!("Initializing Report Engine");

        let dataset_manager = DatasetManager::from_config(config).await?;

        info!("Report Engine initialized successfully");
        Ok(Self::new(dataset_manager, config.recent_limit))
    }

    pub fn dataset_manager(&self) -> &DatasetManager {
        &self.dataset_manager
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Summarize an upload and store it once it is known to be valid.
    ///
    /// Rejected uploads never reach the blob store or the catalog.
    pub async fn upload_dataset(
        &self,
        filename: &str,
        content: Bytes,
    ) -> Result<SummaryResult, ReportError> {
        let summary = summarize_csv(&content).map_err(|e| {
            warn!("Rejecting upload {}: {}", filename, e);
            e
        })?;

        let record = self.dataset_manager.store_upload(filename, content).await?;

        info!(
            "Dataset {} summarized: {} records, {} equipment types",
            record.id,
            summary.total_count,
            summary.type_distribution.len()
        );
        Ok(summary)
    }

    async fn summarize_stored(&self, record: &DatasetRecord) -> Result<SummaryResult, ReportError> {
        let content = self.dataset_manager.load_content(record).await?;
        summarize_csv(&content)
    }

    /// Summaries of the most recent uploads, newest first.
    ///
    /// Datasets that cannot be read or summarized are left out.
    pub async fn recent_summaries(&self) -> Result<Vec<RecentSummary>, ReportError> {
        let records = self.dataset_manager.recent(self.recent_limit).await?;
        let results = join_all(records.iter().map(|r| self.summarize_stored(r))).await;

        let summaries: Vec<RecentSummary> = records
            .iter()
            .zip(results)
            .filter_map(|(record, result)| match result {
                Ok(summary) => Some(RecentSummary::from_record(record, &summary)),
                Err(e) => {
                    warn!("Skipping dataset {} in recent summaries: {}", record.id, e);
                    None
                }
            })
            .collect();

        info!(
            "Summarized {} of {} recent datasets",
            summaries.len(),
            records.len()
        );
        Ok(summaries)
    }

    /// Render the report for the most recently uploaded dataset.
    pub async fn latest_report(&self) -> Result<ReportDocument, ReportError> {
        let record = self
            .dataset_manager
            .latest()
            .await?
            .ok_or(ReportError::NoDatasetError)?;

        info!("Rendering report for dataset {}", record.id);
        let summary = self.summarize_stored(&record).await?;
        render_report(&summary)
    }

    pub async fn health_check(&self) -> Result<(), ReportError> {
        self.dataset_manager.health_check().await
    }
}
