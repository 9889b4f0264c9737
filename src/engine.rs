use crate::error::OcrEngineError;
use crate::preprocessing::NormalizedImage;

/// Raw output of one OCR run
#[derive(Debug, Clone)]
pub struct Recognition {
    /// Text exactly as the engine produced it, before cleanup
    pub text: String,
    /// Mean word confidence, 0.0-1.0
    pub confidence: f32,
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize text on a normalized prescription image
    fn recognize(&self, image: &NormalizedImage) -> Result<Recognition, OcrEngineError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
