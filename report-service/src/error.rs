use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No file uploaded")]
    MissingInputError,

    #[error("Invalid upload: {message}")]
    InvalidUploadError { message: String },

    #[error("Missing required column: {column}")]
    SchemaError { column: String },

    #[error("Dataset contains no data rows")]
    EmptyDatasetError,

    #[error("Invalid numeric value '{value}' in column '{column}' at row {row}")]
    DataTypeError {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Average of column '{column}' is out of numeric range")]
    AverageOutOfRangeError { column: String },

    #[error("Malformed CSV: {0}")]
    MalformedCsvError(#[from] csv::Error),

    #[error("No dataset has been uploaded yet")]
    NoDatasetError,

    #[error("Storage error: {0}")]
    StorageError(#[from] object_store::Error),

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("PDF rendering failed: {message}")]
    PdfError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl ReportError {
    /// True for errors caused by the uploaded content rather than the service.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReportError::MissingInputError
                | ReportError::InvalidUploadError { .. }
                | ReportError::SchemaError { .. }
                | ReportError::EmptyDatasetError
                | ReportError::DataTypeError { .. }
                | ReportError::AverageOutOfRangeError { .. }
                | ReportError::MalformedCsvError(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::NoDatasetError => StatusCode::NOT_FOUND,
            err if err.is_validation() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<diesel::result::Error> for ReportError {
    fn from(err: diesel::result::Error) -> Self {
        ReportError::DatabaseError {
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::PdfError {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
