use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::catalog::DatasetRecord;
use crate::schema::datasets;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = datasets)]
#[diesel(primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Dataset {
    pub id: String,
    /// Insertion order, breaks ties on `uploaded_at`.
    pub seq: i64,
    pub uuid: Uuid,
    pub filename: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = datasets)]
pub struct NewDataset<'a> {
    pub id: &'a str,
    pub uuid: &'a Uuid,
    pub filename: &'a str,
    pub storage_path: &'a str,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl<'a> From<&'a DatasetRecord> for NewDataset<'a> {
    fn from(record: &'a DatasetRecord) -> Self {
        NewDataset {
            id: &record.id,
            uuid: &record.uuid,
            filename: &record.filename,
            storage_path: &record.storage_path,
            size_bytes: record.size_bytes,
            uploaded_at: record.uploaded_at,
        }
    }
}

impl From<Dataset> for DatasetRecord {
    fn from(dataset: Dataset) -> Self {
        DatasetRecord {
            id: dataset.id,
            uuid: dataset.uuid,
            filename: dataset.filename,
            storage_path: dataset.storage_path,
            size_bytes: dataset.size_bytes,
            uploaded_at: dataset.uploaded_at,
        }
    }
}
