//! OCR engine implementations
//!
//! Engines are conditionally compiled based on feature flags.

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrEngineError;
use std::sync::Arc;

/// Information about the active engine
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
}

impl EngineInfo {
    pub fn of(engine: &dyn OcrEngine) -> Self {
        Self {
            name: engine.name(),
            description: engine.description(),
            supported_languages: engine.supported_languages(),
        }
    }
}

/// Initialize the engine this binary was built with
#[cfg(feature = "engine-tesseract")]
pub fn default_engine(config: &Config) -> Result<Arc<dyn OcrEngine>, OcrEngineError> {
    tracing::info!("Initializing tesseract engine...");
    let engine = tesseract::TesseractEngine::new(config)?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "engine-tesseract"))]
pub fn default_engine(_config: &Config) -> Result<Arc<dyn OcrEngine>, OcrEngineError> {
    Err(OcrEngineError::Initialization(
        "No OCR engines available. Build with --features engine-tesseract".to_string(),
    ))
}
