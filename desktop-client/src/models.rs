use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Averages {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadSummary {
    pub total_count: usize,
    pub type_distribution: BTreeMap<String, usize>,
    pub averages: Averages,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecentUpload {
    pub dataset_id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Body of every non-success response from the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
