use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::domain::{RecentSummary, SummaryResult};
use crate::engine::ReportEngine;
use crate::error::ReportError;

pub const UPLOAD_FIELD: &str = "file";

pub struct HttpServer {
    engine: Arc<ReportEngine>,
    max_upload_bytes: usize,
}

impl HttpServer {
    pub fn new(engine: Arc<ReportEngine>) -> Self {
        Self {
            engine,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/upload/", post(upload_dataset))
            .route("/api/summary/", get(recent_summaries))
            .route("/api/report/", get(download_report))
            .route("/health", get(health_check))
            .layer(DefaultBodyLimit::max(self.max_upload_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.engine.clone())
    }

    pub async fn start(&self, addr: SocketAddr) -> Result<(), ReportError> {
        info!("Starting HTTP server on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    pub async fn serve(&self, listener: TcpListener) -> Result<(), ReportError> {
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<(String, Bytes), ReportError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ReportError::InvalidUploadError {
            message: e.body_text(),
        })?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ReportError::InvalidUploadError {
                message: e.body_text(),
            })?;
        return Ok((filename, content));
    }

    Err(ReportError::MissingInputError)
}

async fn upload_dataset(
    State(engine): State<Arc<ReportEngine>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResult>, ReportError> {
    let multipart = multipart.map_err(|e| {
        info!("HTTP: Upload request without multipart body: {}", e);
        ReportError::MissingInputError
    })?;

    let (filename, content) = read_upload(multipart).await?;
    info!(
        "HTTP: Received upload '{}' ({} bytes)",
        filename,
        content.len()
    );

    match engine.upload_dataset(&filename, content).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            error!("HTTP: Upload '{}' failed: {}", filename, e);
            Err(e)
        }
    }
}

async fn recent_summaries(
    State(engine): State<Arc<ReportEngine>>,
) -> Result<Json<Vec<RecentSummary>>, ReportError> {
    info!("HTTP: Received recent summaries request");
    let summaries = engine.recent_summaries().await?;
    Ok(Json(summaries))
}

async fn download_report(State(engine): State<Arc<ReportEngine>>) -> Result<Response, ReportError> {
    info!("HTTP: Received report request");
    let document = engine.latest_report().await?;

    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

async fn health_check(State(engine): State<Arc<ReportEngine>>) -> Response {
    match engine.health_check().await {
        Ok(()) => Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
        .into_response(),
        Err(e) => {
            error!("HTTP: Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
