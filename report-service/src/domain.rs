use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::DatasetRecord;

pub const REPORT_FILENAME: &str = "chemical_equipment_report.pdf";
pub const REPORT_CONTENT_TYPE: &str = "application/pdf";

/// One parsed row of an equipment CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Summary of a single uploaded dataset.
///
/// `total_count` always equals the sum of the `type_distribution` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub total_count: usize,
    pub type_distribution: BTreeMap<String, usize>,
    pub averages: Averages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSummary {
    pub dataset_id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: usize,
}

impl RecentSummary {
    pub fn from_record(record: &DatasetRecord, summary: &SummaryResult) -> Self {
        Self {
            dataset_id: record.id.clone(),
            filename: record.filename.clone(),
            uploaded_at: record.uploaded_at,
            total_count: summary.total_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub filename: String,
    pub content_type: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

impl ReportDocument {
    pub fn pdf(bytes: Vec<u8>, page_count: usize) -> Self {
        Self {
            filename: REPORT_FILENAME.to_string(),
            content_type: REPORT_CONTENT_TYPE.to_string(),
            page_count,
            bytes,
        }
    }
}
