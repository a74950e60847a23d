use desktop_client::{ClientError, ReportServiceClient};
use equipment_report_service::{HttpServer, ReportEngine};
use std::sync::{Arc, Once};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

const EQUIPMENT_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,10,5,100
Pump-2,Pump,20,6,110
Valve-1,Valve,15,6,105
";

fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

async fn spawn_client() -> ReportServiceClient {
    init_test_logging();

    let server = HttpServer::new(Arc::new(ReportEngine::in_memory()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });

    ReportServiceClient::new(format!("http://{}/", addr))
}

#[tokio::test]
async fn test_upload_recent_and_save_report() {
    // Given: A client talking to an in-process service
    let client = spawn_client().await;
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");

    // When: Uploading a CSV
    let dir = tempfile::tempdir().unwrap();
    let summary = client
        .upload_csv("plant.csv", EQUIPMENT_CSV.as_bytes().to_vec())
        .await
        .unwrap();

    // Then: The summary and recent list agree
    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.type_distribution["Pump"], 2);
    assert_eq!(summary.averages.pressure, 5.67);

    let recent = client.recent_uploads().await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].filename, "plant.csv");
    assert_eq!(recent[0].total_count, 3);

    // And: The report is written to the requested path
    let output = dir.path().join("report.pdf");
    let size = client.save_report(&output).await.unwrap();
    let written = std::fs::read(&output).unwrap();
    assert_eq!(written.len(), size);
    assert!(written.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_service_errors_carry_message() {
    let client = spawn_client().await;

    let result = client
        .upload_csv("bad.csv", b"Type,Flowrate\nPump,1\n".to_vec())
        .await;
    match result {
        Err(ClientError::Service { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Missing required column: pressure");
        }
        other => panic!("expected service error, got {:?}", other),
    }

    assert!(client.recent_uploads().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_report_without_upload_writes_nothing() {
    let client = spawn_client().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.pdf");

    let result = client.save_report(&output).await;

    assert!(matches!(
        result,
        Err(ClientError::Service { status: 404, .. })
    ));
    assert!(!output.exists());
}
