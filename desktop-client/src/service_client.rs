use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::path::Path;
use tracing::{error, info};

use crate::error::ClientError;
use crate::models::{ErrorBody, HealthStatus, RecentUpload, UploadSummary};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ReportServiceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ReportServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        info!("Using report service at {}", endpoint);
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Turn a non-success response into the service's own error message.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        error!("Report service returned {}: {}", status, message);
        Err(ClientError::Service {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn upload_csv(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<UploadSummary, ClientError> {
        info!("Uploading {} ({} bytes)", filename, content.len());

        let part = Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/upload/"))
            .multipart(form)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn recent_uploads(&self) -> Result<Vec<RecentUpload>, ClientError> {
        let response = self.client.get(self.url("/api/summary/")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn download_report(&self) -> Result<Vec<u8>, ClientError> {
        let response = self.client.get(self.url("/api/report/")).send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        info!("Downloaded report ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Download the report and write it to `path`.
    ///
    /// Nothing is written when the service has no report to give.
    pub async fn save_report(&self, path: &Path) -> Result<usize, ClientError> {
        let bytes = self.download_report().await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.len())
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
