//! Tesseract engine implementation
//!
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Downloads tessdata (training data) automatically on first use unless a
//! tessdata directory is configured.

use crate::config::Config;
use crate::engine::{OcrEngine, Recognition};
use crate::error::OcrEngineError;
use crate::preprocessing::NormalizedImage;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tesseract_static::tesseract::{OcrEngineMode, PageSegMode, Tesseract};

/// Assume a single uniform block of text (PSM 6). Prescriptions are a block of
/// lines, not a form, table or multi-column page.
const PAGE_SEG_MODE: PageSegMode = PageSegMode::PsmSingleBlock;

/// Default engine mode (OEM 3): whichever recognizer the traineddata supports
const ENGINE_MODE: OcrEngineMode = OcrEngineMode::Default;

/// Tesseract OCR Engine
///
/// Each recognition builds its own Tesseract handle, so nothing is shared
/// between concurrent requests.
pub struct TesseractEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    /// Language for OCR
    language: String,
}

impl TesseractEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrEngineError> {
        let language = config.language.clone();

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path_to_string(path)?,
            None => ensure_tessdata_available(&language)?,
        };

        // Validate that tessdata is accessible by doing a test initialization
        let test_tess = Tesseract::new_with_oem(Some(&tessdata_path), Some(&language), ENGINE_MODE)
            .map_err(|e| {
                OcrEngineError::Initialization(format!("Failed to initialize Tesseract: {}", e))
            })?;
        drop(test_tess);

        tracing::info!(
            "Tesseract engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language,
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine, single text block segmentation"
    }

    fn recognize(&self, image: &NormalizedImage) -> Result<Recognition, OcrEngineError> {
        let (width, height) = image.dimensions();

        // BMP is always supported by leptonica
        let rgb_img = image::DynamicImage::ImageLuma8(image.as_gray().clone()).to_rgb8();
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| OcrEngineError::Recognition(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Running Tesseract on {}x{} image, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess =
            Tesseract::new_with_oem(Some(&self.tessdata_path), Some(&self.language), ENGINE_MODE)
                .map_err(|e| {
                    OcrEngineError::Recognition(format!("Failed to create Tesseract: {}", e))
                })?;
        tess.set_page_seg_mode(PAGE_SEG_MODE);

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            OcrEngineError::Recognition(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        tess = tess
            .recognize()
            .map_err(|e| OcrEngineError::Recognition(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrEngineError::Recognition(format!("Failed to get text: {}", e)))?;

        // 0-100 scale, -1 when nothing was recognized
        let confidence = (tess.mean_text_conf() as f32 / 100.0).clamp(0.0, 1.0);

        Ok(Recognition { text, confidence })
    }

    fn supported_languages(&self) -> Vec<String> {
        vec![self.language.clone()]
    }
}

fn path_to_string(path: &Path) -> Result<String, OcrEngineError> {
    path.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| OcrEngineError::Initialization("Invalid tessdata path".to_string()))
}

// ============================================================================
// Tessdata download helpers
// ============================================================================

/// Ensure tessdata is available, downloading if needed
fn ensure_tessdata_available(language: &str) -> Result<String, OcrEngineError> {
    let cache_dir = tessdata_cache_dir();

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        OcrEngineError::Initialization(format!("Failed to create tessdata directory: {}", e))
    })?;

    let traineddata_path = cache_dir.join(format!("{}.traineddata", language));

    if !traineddata_path.exists() {
        let url = tessdata_url(language);
        tracing::info!(
            "Downloading tessdata for '{}' (this may take a moment)...",
            language
        );
        download_file(&url, &traineddata_path)?;
        tracing::info!("Downloaded tessdata to {:?}", traineddata_path);
    } else {
        tracing::info!("Using cached tessdata from {:?}", cache_dir);
    }

    // Tesseract expects the directory, not the file
    path_to_string(&cache_dir)
}

fn tessdata_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("prescription-ocr")
        .join("tessdata")
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // The full tessdata set carries both the legacy and LSTM models, so the
    // default engine mode can combine them
    format!(
        "https://github.com/tesseract-ocr/tessdata/raw/main/{}.traineddata",
        language
    )
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), OcrEngineError> {
    let response = ureq::get(url).call().map_err(|e| {
        OcrEngineError::Initialization(format!("Failed to download tessdata: {}", e))
    })?;

    let buffer = response
        .into_body()
        .with_config()
        .limit(64 * 1024 * 1024)
        .read_to_vec()
        .map_err(|e| {
            OcrEngineError::Initialization(format!("Failed to read tessdata response: {}", e))
        })?;

    // Write to a sibling file first so an interrupted download is never
    // mistaken for a cached one
    let partial_path = path.with_extension("traineddata.part");
    let mut file = File::create(&partial_path).map_err(|e| {
        OcrEngineError::Initialization(format!("Failed to create tessdata file: {}", e))
    })?;

    file.write_all(&buffer).map_err(|e| {
        OcrEngineError::Initialization(format!("Failed to write tessdata file: {}", e))
    })?;

    std::fs::rename(&partial_path, path).map_err(|e| {
        OcrEngineError::Initialization(format!("Failed to move tessdata file: {}", e))
    })?;

    Ok(())
}
