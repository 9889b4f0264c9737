use crate::config::{is_allowed_filename, Config, ALLOWED_EXTENSIONS};
use crate::engines::{self, EngineInfo};
use crate::error::ApiError;
use crate::ocr::OcrProcessor;
use crate::preprocessing::StepTiming;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Multipart field carrying the photo
const IMAGE_FIELD: &str = "image";

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<OcrProcessor>,
    pub config: Arc<Config>,
}

/// Upload response
#[derive(Serialize)]
pub struct UploadResponse {
    pub text: String,
    pub text_found: bool,
    pub confidence: f32,
    pub processing_time_ms: u64,
    pub preprocessing: PreprocessingResponse,
}

#[derive(Serialize)]
pub struct PreprocessingResponse {
    pub total_time_ms: u64,
    pub steps: Vec<StepTiming>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: EngineInfo,
    pub allowed_extensions: Vec<String>,
    pub max_file_size_bytes: usize,
    pub language: String,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = engines::default_engine(&config)?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        processor: Arc::new(OcrProcessor::new(engine)),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/upload", post(handle_upload))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle prescription uploads
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let start = Instant::now();

    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read file data: {}", e)))?;
        upload = Some((filename, data));
    }

    let (filename, data) = upload.ok_or(ApiError::MissingFile)?;

    if filename.is_empty() {
        return Err(ApiError::NoFileSelected);
    }

    if !is_allowed_filename(&filename) {
        return Err(ApiError::InvalidFileType);
    }

    if data.len() > state.config.max_file_size {
        return Err(ApiError::FileTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    tracing::debug!("Received {} ({} bytes)", filename, data.len());

    // CPU-bound; each request decodes into its own buffers on the blocking pool
    let processor = state.processor.clone();
    let result = tokio::task::spawn_blocking(move || processor.process_prescription(data.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("Processing task failed: {}", e)))??;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "OCR completed in {}ms, confidence: {:.2}, text found: {}",
        processing_time_ms,
        result.confidence,
        result.text.is_found()
    );

    Ok(Json(UploadResponse {
        text: result.text.to_string(),
        text_found: result.text.is_found(),
        confidence: result.confidence,
        processing_time_ms,
        preprocessing: PreprocessingResponse {
            total_time_ms: result.preprocessing.total_time_ms,
            steps: result.preprocessing.steps,
        },
    }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: EngineInfo::of(state.processor.engine()),
        allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        max_file_size_bytes: state.config.max_file_size,
        language: state.config.language.clone(),
    })
}
