pub mod catalog;
pub mod config;
pub mod database;
pub mod dataset_manager;
pub mod domain;
pub mod engine;
pub mod error;
pub mod http_server;
pub mod loader;
pub mod models;
pub mod report;
pub mod schema;
pub mod storage;
pub mod summary;

pub use catalog::{DatasetCatalog, DatasetRecord, InMemoryCatalog};
pub use config::ServiceConfig;
pub use dataset_manager::DatasetManager;
pub use domain::{Averages, RecentSummary, ReportDocument, SummaryResult};
pub use engine::ReportEngine;
pub use error::ReportError;
pub use http_server::HttpServer;
pub use storage::DatasetStorage;
