use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use desktop_client::display::{
    preview_csv, render_distribution, render_recent, render_summary, PREVIEW_ROWS,
};
use desktop_client::{ReportServiceClient, DEFAULT_ENDPOINT};

#[derive(Parser, Debug)]
#[command(name = "desktop-client", version, about = "Chemical equipment report client")]
struct Cli {
    /// Base URL of the report service
    #[arg(long, env = "REPORT_SERVICE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an equipment CSV and print its summary
    Upload { file: PathBuf },
    /// List the most recent uploads
    Recent,
    /// Download the PDF report for the latest upload
    Report {
        #[arg(long, short, default_value = "chemical_equipment_report.pdf")]
        output: PathBuf,
    },
}

fn upload_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desktop_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = ReportServiceClient::new(cli.endpoint);

    match cli.command {
        Command::Upload { file } => {
            let content = tokio::fs::read(&file).await?;
            let summary = client
                .upload_csv(&upload_filename(&file), content.clone())
                .await?;

            println!("{}", render_summary(&summary));
            println!("{}", render_distribution(&summary));
            println!("Preview of {}", file.display());
            print!("{}", preview_csv(&content, PREVIEW_ROWS)?);
        }
        Command::Recent => {
            let uploads = client.recent_uploads().await?;
            print!("{}", render_recent(&uploads));
        }
        Command::Report { output } => {
            let size = client.save_report(&output).await?;
            info!("Report saved to {} ({} bytes)", output.display(), size);
            println!("Report saved to {}", output.display());
        }
    }

    Ok(())
}
