use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Input could not be turned into a raster image
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image data is empty")]
    Empty,

    #[error("Could not decode image: {0}")]
    Malformed(#[from] image::ImageError),
}

/// The OCR engine failed to run (as opposed to running and finding nothing)
#[derive(Error, Debug)]
pub enum OcrEngineError {
    #[error("Failed to initialize OCR engine: {0}")]
    Initialization(String),

    #[error("OCR engine failed: {0}")]
    Recognition(String),
}

/// Error of the full normalize-then-extract chain
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    OcrEngine(#[from] OcrEngineError),
}

/// Errors surfaced by the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Invalid file type. Please upload an image file (PNG, JPG, JPEG)")]
    InvalidFileType,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::NoFileSelected => (StatusCode::BAD_REQUEST, "NO_FILE_SELECTED"),
            ApiError::InvalidFileType => (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::Process(ProcessError::Decode(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR")
            }
            ApiError::Process(ProcessError::OcrEngine(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "OCR_ENGINE_ERROR")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("Error processing image: {}", self);
        } else {
            tracing::warn!("Rejected upload: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
