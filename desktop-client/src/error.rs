use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to report service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Report service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV preview failed: {0}")]
    Csv(#[from] csv::Error),
}
