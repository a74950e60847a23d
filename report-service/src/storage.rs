use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{path::Path as ObjectPath, ObjectStore};
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::error::ReportError;

const DEFAULT_FILENAME: &str = "upload.csv";

/// Blob storage for uploaded CSV files.
#[derive(Debug, Clone)]
pub struct DatasetStorage {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    location: String,
}

fn create_gcs_client(bucket_name: &str) -> Result<Arc<dyn ObjectStore>, ReportError> {
    let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(bucket_name);

    if let Ok(service_account_path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
        builder = builder.with_service_account_path(service_account_path);
    }

    let store = builder.build().map_err(|e| ReportError::ConfigError {
        message: format!(
            "Failed to create GCS client for bucket '{}': {}",
            bucket_name, e
        ),
    })?;

    Ok(Arc::new(store))
}

fn create_s3_client(bucket_name: &str) -> Result<Arc<dyn ObjectStore>, ReportError> {
    let store = AmazonS3Builder::from_env()
        .with_bucket_name(bucket_name)
        .build()
        .map_err(|e| ReportError::ConfigError {
            message: format!(
                "Failed to create S3 client for bucket '{}': {}",
                bucket_name, e
            ),
        })?;

    Ok(Arc::new(store))
}

/// Reduce an uploaded file name to a single safe path segment.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

impl DatasetStorage {
    pub fn new(store: Arc<dyn ObjectStore>, location: impl Into<String>) -> Self {
        Self {
            store,
            prefix: String::new(),
            location: location.into(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory://")
    }

    /// Build the storage backend named by `storage_url`.
    ///
    /// `memory://`, `gs://bucket/prefix` and `s3://bucket/prefix` select the
    /// matching object store; anything else is treated as a local directory.
    pub fn from_url(storage_url: &str) -> Result<Self, ReportError> {
        info!("Initializing upload storage at {}", storage_url);

        if storage_url.starts_with("memory://") {
            return Ok(Self::in_memory());
        }

        if storage_url.starts_with("gs://") || storage_url.starts_with("s3://") {
            let url = Url::parse(storage_url).map_err(|e| ReportError::ConfigError {
                message: format!("Invalid storage URL: {}", e),
            })?;
            let bucket = url
                .host_str()
                .filter(|host| !host.is_empty())
                .ok_or_else(|| ReportError::ConfigError {
                    message: format!("Invalid storage URL: missing bucket in {}", storage_url),
                })?;

            let store = match url.scheme() {
                "gs" => create_gcs_client(bucket)?,
                _ => create_s3_client(bucket)?,
            };

            return Ok(Self {
                store,
                prefix: url.path().trim_matches('/').to_string(),
                location: storage_url.to_string(),
            });
        }

        std::fs::create_dir_all(storage_url)?;
        let local = LocalFileSystem::new_with_prefix(storage_url)?;
        Ok(Self::new(Arc::new(local), storage_url))
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn object_path(&self, dataset_id: &str, filename: &str) -> ObjectPath {
        let relative = format!("datasets/{}/{}", dataset_id, filename);
        if self.prefix.is_empty() {
            ObjectPath::from(relative)
        } else {
            ObjectPath::from(format!("{}/{}", self.prefix, relative))
        }
    }

    /// Store an upload and return its object path.
    pub async fn put(
        &self,
        dataset_id: &str,
        filename: &str,
        content: Bytes,
    ) -> Result<String, ReportError> {
        let path = self.object_path(dataset_id, filename);
        let size = content.len();

        self.store.put(&path, content.into()).await?;

        info!("Stored {} bytes at {}/{}", size, self.location, path);
        Ok(path.to_string())
    }

    pub async fn get(&self, storage_path: &str) -> Result<Bytes, ReportError> {
        let path = ObjectPath::from(storage_path);
        let content = self.store.get(&path).await?.bytes().await?;
        Ok(content)
    }

    pub async fn delete(&self, storage_path: &str) -> Result<(), ReportError> {
        let path = ObjectPath::from(storage_path);
        self.store.delete(&path).await?;
        info!("Deleted {}/{}", self.location, path);
        Ok(())
    }

    /// Every object path currently held under this storage's prefix.
    pub async fn list_paths(&self) -> Result<Vec<String>, ReportError> {
        let prefix = (!self.prefix.is_empty()).then(|| ObjectPath::from(self.prefix.as_str()));
        let objects: Vec<_> = self.store.list(prefix.as_ref()).try_collect().await?;
        Ok(objects
            .into_iter()
            .map(|meta| meta.location.to_string())
            .collect())
    }

    pub async fn exists(&self, storage_path: &str) -> Result<bool, ReportError> {
        let path = ObjectPath::from(storage_path);
        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
