pub mod display;
pub mod error;
pub mod models;
pub mod service_client;

pub use error::ClientError;
pub use service_client::{ReportServiceClient, DEFAULT_ENDPOINT};
