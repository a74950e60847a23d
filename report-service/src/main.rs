use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equipment_report_service::{HttpServer, ReportEngine, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "equipment_report_service=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Equipment Report Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = ServiceConfig::from_env().context("Failed to load configuration")?;
    config.log_summary();

    let engine = Arc::new(
        ReportEngine::from_config(&config)
            .await
            .context("Failed to initialize report engine")?,
    );

    let http_server =
        HttpServer::new(engine.clone()).with_max_upload_bytes(config.max_upload_bytes);
    let http_addr: SocketAddr = ([0, 0, 0, 0], config.http_port).into();
    let http_handle = tokio::spawn(async move {
        if let Err(e) = http_server.start(http_addr).await {
            error!("HTTP server error: {}", e);
        }
    });

    info!("Equipment Report Service started successfully");
    info!("HTTP server listening on {}", http_addr);

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal, gracefully shutting down...");
        }
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
        }
    }

    http_handle.abort();

    info!("Equipment Report Service shutdown complete");
    Ok(())
}
