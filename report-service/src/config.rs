use tracing::info;
use url::Url;

use crate::error::ReportError;

pub const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_STORAGE_URL: &str = "./data/uploads";
pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub http_port: u16,
    pub storage_url: String,
    pub database_url: Option<String>,
    pub recent_limit: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            database_url: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ReportError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e| ReportError::ConfigError {
            message: format!("Invalid {} '{}': {}", name, value, e),
        }),
        None => Ok(default),
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ReportError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            http_port: parse_var("HTTP_PORT", non_empty("HTTP_PORT"), DEFAULT_HTTP_PORT)?,
            storage_url: non_empty("STORAGE_URL")
                .unwrap_or_else(|| DEFAULT_STORAGE_URL.to_string()),
            database_url: non_empty("DATABASE_URL"),
            recent_limit: parse_var(
                "RECENT_DATASET_LIMIT",
                non_empty("RECENT_DATASET_LIMIT"),
                DEFAULT_RECENT_LIMIT,
            )?,
            max_upload_bytes: parse_var(
                "MAX_UPLOAD_BYTES",
                non_empty("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        };

        if config.recent_limit == 0 {
            return Err(ReportError::ConfigError {
                message: "RECENT_DATASET_LIMIT must be at least 1".to_string(),
            });
        }

        Ok(config)
    }

    /// The database URL with any password replaced, safe for logs.
    pub fn redacted_database_url(&self) -> Option<String> {
        self.database_url.as_ref().map(|raw| match Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable>".to_string(),
        })
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  HTTP Port: {}", self.http_port);
        info!("  Storage: {}", self.storage_url);
        match self.redacted_database_url() {
            Some(url) => info!("  Database URL: {}", url),
            None => info!("  Database URL: <unset, in-memory catalog>"),
        }
        info!("  Recent dataset limit: {}", self.recent_limit);
        info!("  Max upload bytes: {}", self.max_upload_bytes);
    }
}
