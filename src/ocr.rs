//! Normalize-then-recognize composition

use crate::engine::OcrEngine;
use crate::error::{OcrEngineError, ProcessError};
use crate::preprocessing::{self, ImageSource, NormalizationReport, NormalizedImage};
use crate::text::ExtractedText;
use std::sync::Arc;

/// Result of processing one prescription photo
#[derive(Debug, Clone)]
pub struct Prescription {
    pub text: ExtractedText,
    /// Engine confidence, 0.0-1.0
    pub confidence: f32,
    pub preprocessing: NormalizationReport,
}

/// Runs OCR on normalized images and cleans the result
///
/// Holds no per-request state; every call owns the images it works on.
#[derive(Clone)]
pub struct OcrProcessor {
    engine: Arc<dyn OcrEngine>,
}

impl OcrProcessor {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &dyn OcrEngine {
        self.engine.as_ref()
    }

    /// Recognize and clean up text on a normalized image
    pub fn extract(&self, image: NormalizedImage) -> Result<ExtractedText, OcrEngineError> {
        self.extract_with_confidence(image).map(|(text, _)| text)
    }

    fn extract_with_confidence(
        &self,
        image: NormalizedImage,
    ) -> Result<(ExtractedText, f32), OcrEngineError> {
        tracing::info!("Extracting text from processed image");

        let recognition = self.engine.recognize(&image).inspect_err(|e| {
            tracing::error!("Error in text extraction: {}", e);
        })?;
        tracing::debug!("Raw extracted text: {:?}", recognition.text);

        let text = ExtractedText::from_raw(&recognition.text);
        match &text {
            ExtractedText::Text(cleaned) => tracing::debug!("Cleaned text: {:?}", cleaned),
            ExtractedText::NoTextFound => tracing::info!("No text found in image"),
        }

        Ok((text, recognition.confidence))
    }

    /// Normalize a prescription photo and extract its text
    pub fn process_prescription<'a>(
        &self,
        source: impl Into<ImageSource<'a>>,
    ) -> Result<Prescription, ProcessError> {
        let (image, report) = preprocessing::normalize_with_report(source)?;
        let (text, confidence) = self.extract_with_confidence(image)?;

        tracing::info!("Prescription processing completed successfully");
        Ok(Prescription {
            text,
            confidence,
            preprocessing: report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Recognition;
    use crate::error::DecodeError;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Returns canned output and remembers the image sizes it was given
    struct StubEngine {
        output: Result<&'static str, &'static str>,
        seen: Mutex<Vec<(u32, u32)>>,
    }

    impl StubEngine {
        fn new(output: Result<&'static str, &'static str>) -> Arc<Self> {
            Arc::new(Self {
                output,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl OcrEngine for StubEngine {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn description(&self) -> &'static str {
            "canned output"
        }

        fn recognize(&self, image: &NormalizedImage) -> Result<Recognition, OcrEngineError> {
            self.seen.lock().unwrap().push(image.dimensions());
            match self.output {
                Ok(text) => Ok(Recognition {
                    text: text.to_string(),
                    confidence: 0.9,
                }),
                Err(msg) => Err(OcrEngineError::Recognition(msg.to_string())),
            }
        }

        fn supported_languages(&self) -> Vec<String> {
            vec!["eng".to_string()]
        }
    }

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x % 7 < 2 {
                Rgb([20, 20, 40])
            } else {
                Rgb([240, 235, 225])
            }
        });
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png
    }

    #[test]
    fn test_extract_cleans_engine_output() {
        let engine = StubEngine::new(Ok("  Line A  \n\n\tLine B\n   \n"));
        let processor = OcrProcessor::new(engine);
        let image = preprocessing::normalize(&sample_png(20, 10)).unwrap();

        let text = processor.extract(image).unwrap();
        assert_eq!(text, ExtractedText::Text("Line A\nLine B".to_string()));
    }

    #[test]
    fn test_extract_returns_sentinel_for_blank_output() {
        let processor = OcrProcessor::new(StubEngine::new(Ok(" \n\t\n")));
        let image = preprocessing::normalize(&sample_png(20, 10)).unwrap();

        assert_eq!(processor.extract(image).unwrap(), ExtractedText::NoTextFound);
    }

    #[test]
    fn test_extract_propagates_engine_failure() {
        let processor = OcrProcessor::new(StubEngine::new(Err("tessdata missing")));
        let image = preprocessing::normalize(&sample_png(20, 10)).unwrap();

        let err = processor.extract(image).unwrap_err();
        assert!(matches!(err, OcrEngineError::Recognition(msg) if msg == "tessdata missing"));
    }

    #[test]
    fn test_process_prescription_feeds_engine_full_size_image() {
        let engine = StubEngine::new(Ok("Rx\nIbuprofen 200mg\n"));
        let processor = OcrProcessor::new(engine.clone());

        let result = processor.process_prescription(&sample_png(33, 21)).unwrap();

        assert_eq!(result.text.as_str(), "Rx\nIbuprofen 200mg");
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.preprocessing.steps.len(), 4);
        assert_eq!(*engine.seen.lock().unwrap(), vec![(33, 21)]);
    }

    #[test]
    fn test_process_prescription_stops_at_decode_error() {
        let engine = StubEngine::new(Ok("unused"));
        let processor = OcrProcessor::new(engine.clone());

        let err = processor
            .process_prescription(b"not an image".as_slice())
            .unwrap_err();

        assert!(matches!(err, ProcessError::Decode(DecodeError::Malformed(_))));
        assert!(engine.seen.lock().unwrap().is_empty());
    }
}
